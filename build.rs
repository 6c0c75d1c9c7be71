fn main() {
    let version = env!("CARGO_PKG_VERSION").to_string();

    println!("cargo:rustc-env=APP_VERSION={}", version);

    // The stylesheet is only needed by the desktop front-end
    #[cfg(feature = "gui")]
    glib_build_tools::compile_resources(
        &["resources"],
        "resources/resources.xml",
        "compiled.gresource",
    );

    println!("cargo:rerun-if-changed=resources");
}

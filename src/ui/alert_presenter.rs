use std::rc::Rc;

use glib::Propagation;
use gtk4::{
    gdk::Key,
    prelude::{BoxExt, ButtonExt, GtkWindowExt, WidgetExt},
    ApplicationWindow, EventControllerKey, Label,
};

use crate::model::AlertModel;

pub struct AlertPresenter {
    window: Rc<ApplicationWindow>,
}

impl AlertPresenter {
    pub fn new(window: &Rc<ApplicationWindow>) -> Self {
        Self {
            window: window.clone(),
        }
    }

    /// Shows `model` as a modal dialog. The completion runs once the dialog
    /// closes, whether through the button, Escape or the window manager.
    pub fn show(&self, model: &AlertModel) {
        let content_area = gtk4::Box::builder()
            .orientation(gtk4::Orientation::Vertical)
            .spacing(10)
            .margin_bottom(16)
            .margin_top(16)
            .margin_start(20)
            .margin_end(20)
            .build();
        let dialog = gtk4::Window::builder()
            .transient_for(self.window.as_ref())
            .title(model.title.as_str())
            .child(&content_area)
            .modal(true)
            .resizable(false)
            .build();

        content_area.append(
            &Label::builder()
                .label(model.title.as_str())
                .css_classes(["alert-title"])
                .build(),
        );
        content_area.append(
            &Label::builder()
                .label(model.message.as_str())
                .justify(gtk4::Justification::Center)
                .wrap(true)
                .build(),
        );

        let button = gtk4::Button::builder()
            .label(model.button_text.as_str())
            .halign(gtk4::Align::Center)
            .build();
        content_area.append(&button);

        button.connect_clicked({
            let dialog = dialog.clone();
            move |_| {
                dialog.close();
            }
        });

        let key_controller = EventControllerKey::new();
        key_controller.connect_key_pressed({
            let dialog = dialog.clone();
            move |_, keyval, _, _| {
                if keyval == Key::Escape {
                    dialog.close();
                    return Propagation::Stop;
                }
                Propagation::Proceed
            }
        });
        dialog.add_controller(key_controller);

        dialog.connect_close_request({
            let model = model.clone();
            move |_| {
                log::trace!(target: "alert_presenter", "Alert dismissed: {}", model.title);
                model.complete();
                Propagation::Proceed
            }
        });

        dialog.present();
    }
}

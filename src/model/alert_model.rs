use std::fmt;
use std::rc::Rc;

#[derive(Clone)]
pub struct AlertModel {
    pub title: String,
    pub message: String,
    pub button_text: String,
    pub completion: Option<Rc<dyn Fn()>>,
}

impl AlertModel {
    pub fn complete(&self) {
        if let Some(completion) = &self.completion {
            completion();
        }
    }
}

impl fmt::Debug for AlertModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertModel")
            .field("title", &self.title)
            .field("message", &self.message)
            .field("button_text", &self.button_text)
            .field("has_completion", &self.completion.is_some())
            .finish()
    }
}

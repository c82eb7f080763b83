use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use crate::ui::state::{HiddenReason, UiState};

pub const HIDDEN_CLASS: &str = "hidden";

/// Fixed ids the host page gives the widget's elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    Wrapper,
    Form,
    Success,
    Error,
    ErrorText,
    AlreadySubscribed,
    Dismiss,
}

impl ElementId {
    pub const ALL: [ElementId; 7] = [
        ElementId::Wrapper,
        ElementId::Form,
        ElementId::Success,
        ElementId::Error,
        ElementId::ErrorText,
        ElementId::AlreadySubscribed,
        ElementId::Dismiss,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementId::Wrapper => "ghost-signup-wrapper",
            ElementId::Form => "ghost-signup-form",
            ElementId::Success => "ghost-signup-success",
            ElementId::Error => "ghost-signup-error",
            ElementId::ErrorText => "ghost-signup-error-text",
            ElementId::AlreadySubscribed => "ghost-signup-already-subscribed",
            ElementId::Dismiss => "ghost-signup-dismiss",
        }
    }
}

/// The side of the host page the widget writes to.
///
/// Every operation must be idempotent and must quietly do nothing when the
/// element is not on the page.
pub trait Renderer: Send + Sync {
    fn has_element(&self, id: ElementId) -> bool;
    fn show(&self, id: ElementId);
    fn hide(&self, id: ElementId);
    fn set_text(&self, id: ElementId, text: &str);
}

/// Pushes `state` onto the page.
pub fn render(state: &UiState, renderer: &dyn Renderer) {
    use ElementId::*;

    match state {
        UiState::Hidden(reason) => {
            if renderer.has_element(Wrapper) {
                renderer.hide(Wrapper);
                return;
            }
            for id in [Form, Success, Error, Dismiss] {
                renderer.hide(id);
            }
            match reason {
                HiddenReason::AlreadySubscribed => renderer.show(AlreadySubscribed),
                HiddenReason::Dismissed => renderer.hide(AlreadySubscribed),
            }
        }
        UiState::FormVisible => {
            renderer.show(Wrapper);
            renderer.show(Form);
            renderer.show(Dismiss);
            for id in [Success, Error, AlreadySubscribed] {
                renderer.hide(id);
            }
        }
        UiState::InlineError(message) => {
            renderer.show(Wrapper);
            renderer.show(Form);
            renderer.show(Dismiss);
            renderer.hide(Success);
            renderer.hide(AlreadySubscribed);
            set_error_text(renderer, message);
            renderer.show(Error);
        }
        UiState::ErrorVisible(message) => {
            renderer.show(Wrapper);
            renderer.hide(Form);
            renderer.hide(Success);
            renderer.hide(AlreadySubscribed);
            set_error_text(renderer, message);
            renderer.show(Error);
        }
        UiState::SuccessVisible(message) => {
            renderer.show(Wrapper);
            renderer.hide(Form);
            renderer.hide(Error);
            renderer.hide(AlreadySubscribed);
            renderer.set_text(Success, message);
            renderer.show(Success);
        }
    }
}

fn set_error_text(renderer: &dyn Renderer, message: &str) {
    if renderer.has_element(ElementId::ErrorText) {
        renderer.set_text(ElementId::ErrorText, message);
    } else {
        renderer.set_text(ElementId::Error, message);
    }
}

#[derive(Debug, Default, Clone)]
struct Element {
    classes: HashSet<String>,
    text: String,
}

/// In-memory model of the host page, toggling a `hidden` class on each
/// element the way the stylesheet expects.
#[derive(Debug, Default)]
pub struct Page {
    elements: Mutex<HashMap<ElementId, Element>>,
}

impl Page {
    pub fn new(with_wrapper: bool) -> Self {
        Self::with_elements(
            ElementId::ALL
                .into_iter()
                .filter(|id| with_wrapper || *id != ElementId::Wrapper),
        )
    }

    pub fn with_elements(ids: impl IntoIterator<Item = ElementId>) -> Self {
        let elements = ids
            .into_iter()
            .map(|id| (id, Element::default()))
            .collect();
        Self {
            elements: Mutex::new(elements),
        }
    }

    /// Visible means present, not carrying `hidden`, and not inside a
    /// hidden wrapper.
    pub fn is_visible(&self, id: ElementId) -> bool {
        let Ok(elements) = self.elements.lock() else {
            return false;
        };
        let shown = |id: ElementId| {
            elements
                .get(&id)
                .map(|e| !e.classes.contains(HIDDEN_CLASS))
        };
        let wrapper_shown = shown(ElementId::Wrapper).unwrap_or(true);
        match id {
            ElementId::Wrapper => shown(id).unwrap_or(false),
            _ => wrapper_shown && shown(id).unwrap_or(false),
        }
    }

    pub fn text(&self, id: ElementId) -> Option<String> {
        self.elements
            .lock()
            .ok()?
            .get(&id)
            .map(|e| e.text.clone())
    }

    fn with_element(&self, id: ElementId, f: impl FnOnce(&mut Element)) {
        match self.elements.lock() {
            Ok(mut elements) => match elements.get_mut(&id) {
                Some(element) => f(element),
                None => tracing::debug!(element = id.as_str(), "Element is not on the page"),
            },
            Err(_) => tracing::warn!(element = id.as_str(), "Page state is poisoned"),
        }
    }
}

impl Renderer for Page {
    fn has_element(&self, id: ElementId) -> bool {
        self.elements
            .lock()
            .map(|e| e.contains_key(&id))
            .unwrap_or(false)
    }

    fn show(&self, id: ElementId) {
        self.with_element(id, |e| {
            e.classes.remove(HIDDEN_CLASS);
        });
    }

    fn hide(&self, id: ElementId) {
        self.with_element(id, |e| {
            e.classes.insert(HIDDEN_CLASS.to_string());
        });
    }

    fn set_text(&self, id: ElementId, text: &str) {
        self.with_element(id, |e| e.text = text.to_string());
    }
}

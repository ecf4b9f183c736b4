/// One attempt by the page to navigate, either in place or into a new window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub target_url: String,
    pub current_url: String,
    pub cancelable: bool,
}

impl NavigationRequest {
    pub fn new(target_url: impl Into<String>, current_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            current_url: current_url.into(),
            cancelable: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationDecision {
    pub allow: bool,
    pub open_externally: bool,
}

impl NavigationDecision {
    pub const IN_APP: Self = Self {
        allow: true,
        open_externally: false,
    };

    pub const EXTERNAL: Self = Self {
        allow: false,
        open_externally: true,
    };
}

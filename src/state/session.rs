/// Credentials of the logged-in screen.
///
/// Lives for the whole process. Going back to the login view keeps it; the
/// next successful login replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub screen_id: String,
    pub token: Option<String>,
}

impl Session {
    pub fn new(screen_id: impl Into<String>, token: Option<String>) -> Self {
        Self {
            screen_id: screen_id.into(),
            token,
        }
    }

    /// The token, if one was issued and it isn't blank.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

use serde::{Deserialize, Serialize};

use common::prelude::Credentials;

pub mod login;
pub mod logout;
pub mod register;

/// Form fields shared by registration and login; absent fields read as empty
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub pswd: String,
}

impl From<CredentialsForm> for Credentials {
    fn from(form: CredentialsForm) -> Self {
        Credentials::new(form.login, form.pswd)
    }
}

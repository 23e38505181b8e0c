use crate::features::auth::types::Role;
use serde::Serialize;

/// Body for admin create and update calls. Password fields are omitted on
/// update when left blank so the stored password is kept.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpsert {
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
}

/// Body for a self-service profile update. The role is not editable here.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{ProfileUpdate, UserUpsert};
    use crate::features::auth::types::Role;
    use serde_json::json;

    #[test]
    fn blank_passwords_are_not_sent() {
        let body = ProfileUpdate {
            title: "Mr".to_string(),
            first_name: "Alan".to_string(),
            last_name: "Turing".to_string(),
            email: "alan@example.test".to_string(),
            password: None,
            confirm_password: None,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "title": "Mr",
                "firstName": "Alan",
                "lastName": "Turing",
                "email": "alan@example.test"
            })
        );
    }

    #[test]
    fn upsert_serializes_role_by_name() {
        let body = UserUpsert {
            title: "Ms".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.test".to_string(),
            role: Role::Admin,
            password: Some("secret1".to_string()),
            confirm_password: Some("secret1".to_string()),
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["role"], "Admin");
        assert_eq!(value["confirmPassword"], "secret1");
    }
}

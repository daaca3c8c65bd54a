use crate::auth::AuthContext;
use crate::error::{ErrorKind, Result};
use crate::interface::{HttpClient, RequestApi};
use crate::model::dtos::{LoginParams, RegisterParams};
use crate::model::structs::User;

/// Attach the context's token (or none) to the client.
pub fn authorize<C: HttpClient>(client: &mut C, ctx: &AuthContext) {
    client.set_token(ctx.token().map(String::from));
}

pub async fn login<'a, C>(
    client: &mut C,
    ctx: &'a mut AuthContext,
    email: &str,
    password: &str,
) -> Result<&'a User>
where
    C: RequestApi + HttpClient,
{
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ErrorKind::InvalidInput("Email and password are required".to_string()).into());
    }

    let auth = client.login(LoginParams { email, password }).await?;
    client.set_token(Some(auth.token.clone()));
    let user = ctx.login(auth);
    tracing::info!(user_id = user.id, role = %user.role, "logged in");
    Ok(user)
}

pub async fn register<'a, C>(
    client: &mut C,
    ctx: &'a mut AuthContext,
    name: &str,
    email: &str,
    password: &str,
    password_confirmation: &str,
) -> Result<&'a User>
where
    C: RequestApi + HttpClient,
{
    let params = validate_registration(name, email, password, password_confirmation)?;

    let auth = client.register(params).await?;
    client.set_token(Some(auth.token.clone()));
    let user = ctx.login(auth);
    tracing::info!(user_id = user.id, "registered");
    Ok(user)
}

pub fn logout<C: HttpClient>(client: &mut C, ctx: &mut AuthContext) {
    ctx.logout();
    client.set_token(None);
}

fn validate_registration<'a>(
    name: &'a str,
    email: &'a str,
    password: &'a str,
    password_confirmation: &'a str,
) -> Result<RegisterParams<'a>> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(
            ErrorKind::InvalidInput("Name, email and password are required".to_string()).into(),
        );
    }
    if password != password_confirmation {
        return Err(ErrorKind::InvalidInput("Passwords do not match".to_string()).into());
    }
    Ok(RegisterParams {
        name,
        email,
        password,
        password_confirmation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_requires_matching_passwords() {
        let err = validate_registration("Dana", "dana@example.edu", "hunter22", "hunter23")
            .unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn registration_trims_name_and_email() {
        let params =
            validate_registration(" Dana ", " dana@example.edu", "hunter22", "hunter22").unwrap();
        assert_eq!(params.name, "Dana");
        assert_eq!(params.email, "dana@example.edu");
    }

    #[test]
    fn registration_rejects_blank_fields() {
        assert!(validate_registration("  ", "a@b.c", "pw", "pw").is_err());
        assert!(validate_registration("Dana", "a@b.c", "", "").is_err());
    }
}

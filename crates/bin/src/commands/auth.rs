//! Account authorization commands.

use sherry::api::types::{LoginPayload, RegisterPayload};
use sherry::api::Api;
use sherry::auth::Credential;
use sherry::validate;
use sherry::{RegistryStore, Result};

use crate::cli::{DefaultArgs, LoginArgs, RegisterArgs};
use crate::prompt;

const PASSWORD_RULES: &str =
    "at least 6 characters, one capital letter, one lowercase letter and one number";

pub async fn register(
    registry: &mut RegistryStore,
    api: &impl Api,
    args: &RegisterArgs,
) -> Result<()> {
    registry
        .run_command(async |reg| {
            let email = prompt::input("Email", &args.email, validate::is_email)?;
            let username = prompt::input("Username", &args.user, validate::is_word)?;
            let password = prompt::password(
                &format!("Password ({PASSWORD_RULES})"),
                &args.password,
                validate::is_password,
            )?;

            if reg
                .credentials()
                .iter()
                .any(|c| c.email == email || c.username == username)
            {
                eprintln!("User already authorized");
            }

            println!("Creating user...");
            let created = api
                .register(&RegisterPayload {
                    username,
                    email,
                    password: password.clone(),
                })
                .await?;
            println!("User created successfully");

            println!("Authorizing...");
            let session = api
                .login(&LoginPayload {
                    email: created.email,
                    password,
                })
                .await?;
            let credential = Credential::from(session);
            let username = credential.username.clone();
            reg.credentials_mut().upsert(credential);
            if reg.credentials().len() == 1 {
                println!("It is the only user, setting it as default");
            }
            println!("Authorized as {username}");
            Ok(())
        })
        .await
}

pub async fn login(registry: &mut RegistryStore, api: &impl Api, args: &LoginArgs) -> Result<()> {
    registry
        .run_command(async |reg| {
            let email = prompt::input("Email", &args.email, validate::is_email)?;
            let password = prompt::password("Password", &args.password, validate::is_password)?;

            println!("Authorizing...");
            let session = api.login(&LoginPayload { email, password }).await?;
            let credential = Credential::from(session);
            let username = credential.username.clone();
            reg.credentials_mut().upsert(credential);
            println!("Authorized as {username}");
            Ok(())
        })
        .await
}

pub fn list(registry: &RegistryStore) {
    if registry.credentials().is_empty() {
        println!("No authorized users");
        return;
    }
    let default_id = registry
        .credentials()
        .default_credential()
        .map(|c| c.user_id.clone())
        .unwrap_or_default();

    println!("* - default user");
    println!();
    for credential in registry.credentials().iter() {
        let marker = if credential.user_id == default_id {
            "*"
        } else {
            " "
        };
        let state = if credential.expired { " (expired)" } else { "" };
        println!("{marker} {} <{}>{state}", credential.username, credential.email);
    }
}

pub async fn default(registry: &mut RegistryStore, args: &DefaultArgs) -> Result<()> {
    let Some(username) = &args.username else {
        match registry.credentials().default_credential() {
            Some(credential) => println!("Default user: {}", credential.username),
            None => println!("No default user set"),
        }
        return Ok(());
    };

    registry
        .run_command(async |reg| {
            let credential = reg.credentials_mut().set_default(username)?;
            println!("User {} set as default", credential.username);
            Ok(())
        })
        .await
}

use clap::Subcommand;
use serde_json::json;

use crate::cli::config::CliContext;
use crate::cli::utils::{output_data, output_success};
use crate::cli::OutputFormat;
use crate::models::{AuthForm, LoginCredentials, RegistrationForm};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the portal (or the admin backend with --admin)")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
        #[arg(long, help = "First name (admin login)")]
        firstname: Option<String>,
        #[arg(long, help = "Last name (admin login)")]
        lastname: Option<String>,
        #[arg(long, help = "Email verification code")]
        code: Option<String>,
        #[arg(long, help = "Authenticate against the admin users backend")]
        admin: bool,
    },

    #[command(about = "Logout and forget the stored session")]
    Logout {
        #[arg(long, help = "Only drop the local session, without calling the portal")]
        admin: bool,
    },

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Refresh authentication token")]
    Refresh,

    #[command(about = "Show current user information")]
    Whoami,

    #[command(about = "Register new user")]
    Register {
        #[arg(help = "First name")]
        firstname: String,
        #[arg(help = "Last name")]
        lastname: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
        #[arg(long, help = "Keep the session after the browser closes")]
        remember_me: bool,
    },

    #[command(about = "Send an email verification code")]
    VerifyEmail {
        #[arg(help = "Email")]
        email: String,
    },

    #[command(about = "Confirm an email address with the received code")]
    ConfirmEmail {
        #[arg(help = "Email")]
        email: String,
        #[arg(help = "Verification code")]
        code: String,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::load()?;

    match cmd {
        AuthCommands::Login { email, password, firstname, lastname, code, admin } => {
            if admin {
                let credentials = LoginCredentials { firstname, lastname, email: email.clone(), password };
                let token = ctx.auth.login(&credentials).await?;
                return output_success(
                    &output_format,
                    &format!("Logged in to admin backend as {}", email),
                    Some(json!({ "identity": token.identity() })),
                );
            }

            let form = AuthForm { email: email.clone(), password, code };
            match ctx.sessions.login(&form).await? {
                Some(response) => output_success(
                    &output_format,
                    &format!("Logged in as {}", email),
                    Some(json!({ "user": response.user })),
                ),
                None => output_success(
                    &output_format,
                    "Login accepted without a token; confirm your email and retry with --code",
                    None,
                ),
            }
        }
        AuthCommands::Logout { admin } => {
            if admin {
                ctx.auth.logout()?;
                return output_success(&output_format, "Local session removed", None);
            }
            if ctx.sessions.logout().await? {
                output_success(&output_format, "Logged out", None)
            } else {
                output_success(&output_format, "Portal did not confirm the logout; session kept", None)
            }
        }
        AuthCommands::Status => {
            let session = ctx.credentials.session()?;
            match session {
                Some(session) => output_success(
                    &output_format,
                    &format!("Authenticated (session saved {})", session.saved_at.to_rfc3339()),
                    Some(json!({ "authenticated": true, "saved_at": session.saved_at })),
                ),
                None => output_success(&output_format, "Not authenticated", Some(json!({ "authenticated": false }))),
            }
        }
        AuthCommands::Refresh => {
            ctx.sessions.refresh().await?;
            output_success(&output_format, "Token refreshed", None)
        }
        AuthCommands::Whoami => {
            ctx.auth.check_auth()?;
            let identity = ctx.auth.identity()?;
            match output_format {
                OutputFormat::Json => output_data(&output_format, &identity),
                OutputFormat::Text => {
                    println!("Id: {}", identity.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()));
                    println!("Name: {}", identity.full_name.as_deref().unwrap_or("-"));
                    if let Some(avatar) = identity.avatar {
                        println!("Avatar: {}", avatar);
                    }
                    Ok(())
                }
            }
        }
        AuthCommands::Register { firstname, lastname, email, password, remember_me } => {
            let form = RegistrationForm {
                firstname,
                lastname,
                email: email.clone(),
                password,
                is_remember_me: remember_me.then_some(true),
            };
            let response = ctx.sessions.register(&form).await?;
            output_success(&output_format, &format!("Registered {}", email), Some(json!({ "response": response })))
        }
        AuthCommands::VerifyEmail { email } => {
            ctx.sessions.request_email_verification(&email).await?;
            output_success(&output_format, &format!("Verification code sent to {}", email), None)
        }
        AuthCommands::ConfirmEmail { email, code } => {
            ctx.sessions.confirm_email_verification(&email, &code).await?;
            output_success(&output_format, &format!("Email {} confirmed", email), None)
        }
    }
}

//! Sign-in related commands.

use crate::cli::common::{
    print_error, print_info, print_success, prompt_password, value_or_prompt, CliContext,
};
use crate::utils::validation::Registration;
use anyhow::{bail, Result};

pub fn cmd_login(ctx: &CliContext, email: Option<String>) -> Result<()> {
    let email = value_or_prompt(email, "Email")?;
    let password = prompt_password("Password")?;

    let mut session = ctx.session()?;
    match ctx.runtime.block_on(session.login(&email, &password)) {
        Ok(user) => {
            print_success(&format!("Signed in as {}", user.email));
            Ok(())
        }
        Err(failure) => bail!(failure.message),
    }
}

pub fn cmd_register(ctx: &CliContext, email: Option<String>) -> Result<()> {
    let email = value_or_prompt(email, "Email")?;
    let password = prompt_password("Password")?;
    let confirm = prompt_password("Confirm password")?;
    let form = Registration::new(&email, &password, &confirm);

    let mut session = ctx.session()?;
    match ctx.runtime.block_on(session.register(&form)) {
        Ok(user) => {
            print_success(&format!("Account created. Signed in as {}", user.email));
            Ok(())
        }
        Err(failure) => {
            for detail in failure.details.iter().skip(1) {
                print_error(detail);
            }
            bail!(failure.message)
        }
    }
}

pub fn cmd_logout(ctx: &CliContext) -> Result<()> {
    let mut session = ctx.session()?;
    session.logout();
    print_success("Signed out");
    Ok(())
}

pub fn cmd_whoami(ctx: &CliContext) -> Result<()> {
    let mut session = ctx.session()?;
    if !ctx.runtime.block_on(session.init()) {
        print_info("Not signed in");
        return Ok(());
    }
    if let Some(user) = session.user() {
        match &user.name {
            Some(name) => println!("{} <{}>", name, user.email),
            None => println!("{}", user.email),
        }
        println!("  id: {}", user.id);
    }
    Ok(())
}

pub fn cmd_forgot_password(ctx: &CliContext, email: Option<String>) -> Result<()> {
    let email = value_or_prompt(email, "Email")?;
    if email.trim().is_empty() {
        bail!("Email is required");
    }
    let session = ctx.session()?;
    match ctx.runtime.block_on(session.forgot_password(&email)) {
        Ok(()) => {
            print_success("Password reset link sent to your email!");
            Ok(())
        }
        Err(e) => bail!(e.user_message("Failed to send reset link")),
    }
}

//! Login, logout and whoami.

use std::error::Error;

use super::Context;

#[allow(clippy::print_stdout)]
pub fn login(ctx: &Context, username: &str) -> Result<(), Box<dyn Error>> {
    let user = ctx.session.login(username)?;
    println!("Benvenuto, {user}!");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn logout(ctx: &Context) -> Result<(), Box<dyn Error>> {
    ctx.session.logout()?;
    println!("Logout effettuato.");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn whoami(ctx: &Context) -> Result<(), Box<dyn Error>> {
    let user = ctx.session.require()?;
    println!("{user}");
    Ok(())
}

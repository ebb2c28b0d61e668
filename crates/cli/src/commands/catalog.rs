//! Catalog commands: movie list, details and favorites.

use std::io::Write;

use myflix_core::MovieId;
use myflix_web::models::Notifications;
use myflix_web::services::{account, catalog};

use super::{CliError, Context, succeeded};

/// How `myflix favorites add|remove|toggle` changes the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    Add,
    Remove,
    Toggle,
}

/// List every movie, starring favorites.
pub async fn movies<W: Write + Send>(ctx: &mut Context<W>) -> Result<(), CliError> {
    let mut notes = Notifications::new();
    let view = catalog::load_movies(&ctx.api, &ctx.session, &mut notes).await?;
    ctx.report(&notes)?;

    for movie in &view.movies {
        let star = if view.is_favorite(&movie.id) { '*' } else { ' ' };
        writeln!(
            ctx.out,
            "{star} {}  {} ({}, {})",
            movie.id, movie.title, movie.genre.name, movie.director.name
        )?;
    }
    succeeded(notes.is_empty())
}

pub async fn movie<W: Write + Send>(ctx: &mut Context<W>, title: &str) -> Result<(), CliError> {
    let mut notes = Notifications::new();
    let movie = catalog::movie_synopsis(&ctx.api, &ctx.session, &mut notes, title).await?;
    ctx.report(&notes)?;

    let Some(movie) = movie else {
        return Err(CliError::Failed);
    };
    writeln!(ctx.out, "{}", movie.title)?;
    writeln!(
        ctx.out,
        "Genre: {}  Director: {}",
        movie.genre.name, movie.director.name
    )?;
    writeln!(ctx.out)?;
    writeln!(ctx.out, "{}", movie.description)?;
    Ok(())
}

pub async fn genre<W: Write + Send>(ctx: &mut Context<W>, name: &str) -> Result<(), CliError> {
    let mut notes = Notifications::new();
    let genre = catalog::genre_detail(&ctx.api, &ctx.session, &mut notes, name).await?;
    ctx.report(&notes)?;

    let Some(genre) = genre else {
        return Err(CliError::Failed);
    };
    writeln!(ctx.out, "{}", genre.name)?;
    writeln!(ctx.out, "{}", genre.description)?;
    Ok(())
}

pub async fn director<W: Write + Send>(ctx: &mut Context<W>, name: &str) -> Result<(), CliError> {
    let mut notes = Notifications::new();
    let director = catalog::director_detail(&ctx.api, &ctx.session, &mut notes, name).await?;
    ctx.report(&notes)?;

    let Some(director) = director else {
        return Err(CliError::Failed);
    };
    writeln!(ctx.out, "{} ({})", director.name, director.lifespan())?;
    writeln!(ctx.out, "{}", director.bio)?;
    Ok(())
}

/// List favorite movies.
pub async fn favorites<W: Write + Send>(ctx: &mut Context<W>) -> Result<(), CliError> {
    ctx.require_user().await?;

    let mut notes = Notifications::new();
    let view = account::load_profile(&ctx.api, &ctx.session, &mut notes).await?;
    ctx.report(&notes)?;

    for movie in &view.favorites {
        writeln!(ctx.out, "{}  {}", movie.id, movie.title)?;
    }
    succeeded(notes.is_empty())
}

/// Change one favorite. Fails unless the server accepted the change.
pub async fn change_favorite<W: Write + Send>(
    ctx: &mut Context<W>,
    movie_id: &str,
    change: FavoriteChange,
) -> Result<(), CliError> {
    ctx.require_user().await?;
    let id = MovieId::new(movie_id);

    let mut notes = Notifications::new();
    let accepted = match change {
        FavoriteChange::Add => {
            catalog::add_favorite(&ctx.api, &ctx.session, &mut notes, &id).await?
        }
        FavoriteChange::Remove => {
            catalog::remove_favorite(&ctx.api, &ctx.session, &mut notes, &id).await?
        }
        FavoriteChange::Toggle => {
            catalog::toggle_favorite(&ctx.api, &ctx.session, &mut notes, &id).await?
        }
    };
    ctx.report(&notes)?;
    succeeded(accepted)
}

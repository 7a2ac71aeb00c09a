//! Interactive text menu.
//!
//! Reads one choice per line and runs the matching flow to completion before
//! prompting again, so at most one request is ever outstanding.

use crate::client::Transport;
use crate::pipeline::Pipeline;
use crate::presenter::Presenter;
use chrono::NaiveDate;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Picture,
    Asteroids,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" | "apod" | "picture" => Some(Self::Picture),
            "2" | "neo" | "asteroids" => Some(Self::Asteroids),
            "3" | "q" | "quit" | "exit" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Run the menu until the user exits or `input` reaches end of file.
/// `today` supplies the date used for the asteroid feed on each request.
pub async fn run_menu<T, R, P, F>(
    pipeline: &Pipeline<T>,
    input: R,
    presenter: &mut P,
    today: F,
) -> io::Result<()>
where
    T: Transport,
    R: AsyncBufRead + Unpin,
    P: Presenter,
    F: Fn() -> NaiveDate,
{
    let mut lines = input.lines();

    loop {
        presenter.render_menu()?;

        let Some(line) = lines.next_line().await? else {
            tracing::debug!("Input closed, leaving menu");
            return Ok(());
        };

        match MenuChoice::parse(&line) {
            Some(MenuChoice::Picture) => {
                let fetch = pipeline.picture().await;
                presenter.render_picture(&fetch)?;
            }
            Some(MenuChoice::Asteroids) => {
                let outcome = pipeline.asteroid_table(today()).await;
                presenter.render_asteroids(&outcome)?;
            }
            Some(MenuChoice::Exit) => {
                presenter.render_notice("Goodbye.")?;
                return Ok(());
            }
            None => presenter.render_notice(&format!("Unknown option: {}", line.trim()))?,
        }
    }
}

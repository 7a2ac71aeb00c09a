//! Rendering of fetch outcomes for the user.

use crate::outcome::FetchOutcome;
use crate::pipeline::PictureFetch;
use std::io::{self, Write};

/// Presentation contract consumed by the menu and the CLI.
pub trait Presenter {
    fn render_picture(&mut self, fetch: &PictureFetch) -> io::Result<()>;

    /// Render the asteroid flow, already formatted as a table on success.
    fn render_asteroids(&mut self, outcome: &FetchOutcome<String>) -> io::Result<()>;

    fn render_menu(&mut self) -> io::Result<()>;

    fn render_notice(&mut self, message: &str) -> io::Result<()>;
}

/// Text presenter writing to any [`Write`] sink (usually stdout).
pub struct ConsolePresenter<W> {
    out: W,
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render_failure<T>(&mut self, context: &str, outcome: &FetchOutcome<T>) -> io::Result<()> {
        match outcome {
            FetchOutcome::Success(_) => Ok(()),
            FetchOutcome::ClientError { status, detail } => {
                writeln!(self.out, "Error fetching {} (status {}): {}", context, status, detail)
            }
            FetchOutcome::ServerError {
                status: Some(status),
                detail,
            } => writeln!(self.out, "Error fetching {} (status {}): {}", context, status, detail),
            FetchOutcome::ServerError { status: None, detail } => {
                writeln!(self.out, "Error fetching {}: {}", context, detail)
            }
            FetchOutcome::Unreachable(cause) => writeln!(
                self.out,
                "Error fetching {}: server unreachable ({})",
                context, cause
            ),
        }
    }
}

impl ConsolePresenter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn render_picture(&mut self, fetch: &PictureFetch) -> io::Result<()> {
        let record = match &fetch.picture {
            FetchOutcome::Success(record) => record,
            failure => return self.render_failure("APOD data", failure),
        };

        writeln!(self.out, "Astronomy Picture of the Day:")?;
        writeln!(self.out, "Title: {}", record.title)?;
        if let Some(date) = &record.date {
            writeln!(self.out, "Date: {}", date)?;
        }
        writeln!(self.out, "Explanation: {}", record.explanation)?;
        writeln!(self.out, "URL: {}", record.image_url)?;

        match &fetch.image {
            Some(FetchOutcome::Success(cached)) => {
                let preview = cached.preview();
                writeln!(
                    self.out,
                    "Saved image: {} ({}x{}, preview {}x{})",
                    cached.path.display(),
                    cached.width(),
                    cached.height(),
                    preview.width(),
                    preview.height()
                )?;
            }
            Some(failure) => self.render_failure("APOD image", failure)?,
            None => writeln!(self.out, "No image saved: today's media is not a still image")?,
        }

        self.out.flush()
    }

    fn render_asteroids(&mut self, outcome: &FetchOutcome<String>) -> io::Result<()> {
        match outcome {
            FetchOutcome::Success(table) => {
                writeln!(self.out, "Near-Earth Objects:")?;
                write!(self.out, "{}", table)?;
            }
            failure => self.render_failure("NEO data", failure)?,
        }
        self.out.flush()
    }

    fn render_menu(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "1. Astronomy Picture of the Day")?;
        writeln!(self.out, "2. Near-Earth Objects (today)")?;
        writeln!(self.out, "3. Exit")?;
        write!(self.out, "Choose an option: ")?;
        self.out.flush()
    }

    fn render_notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", message)?;
        self.out.flush()
    }
}

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::ApiError;
use crate::models::Customer;
use crate::ui::form::{render_form, CustomerForm};
use crate::ui::results::{render_results, SearchResults};

pub enum ConsoleAction {
    Exit,
    Create,
    Update,
    Retrieve,
    Delete,
    Clear,
    Activate,
    Search,
}

/// Result of one issued request, one variant per operation.
pub enum Outcome {
    Created(Result<Customer, ApiError>),
    Updated(Result<Customer, ApiError>),
    Retrieved(Result<Customer, ApiError>),
    Deleted(Result<(), ApiError>),
    Activated(Result<Customer, ApiError>),
    Searched(Result<Vec<Customer>, ApiError>),
}

/// A finished request on its way back to the UI loop, tagged with the
/// sequence number it was issued under.
pub struct Completion {
    pub seq: u64,
    pub outcome: Outcome,
}

// Represents the state of the customer console screen
pub struct ConsoleState {
    pub form: CustomerForm,
    pub search_results: SearchResults,
    pub flash_message: String,
    issued: u64,
}

impl ConsoleState {
    pub fn new() -> Self {
        Self {
            form: CustomerForm::new(),
            search_results: SearchResults::new(),
            flash_message: String::new(),
            issued: 0,
        }
    }

    /// Tag a new request. Only the completion carrying the latest tag is
    /// applied, so overlapping requests cannot clobber a newer result with
    /// an older one.
    pub fn begin_request(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// The clear trigger: local only, empties the id and the data fields.
    pub fn clear_form(&mut self) {
        self.form.clear_all();
    }

    fn flash(&mut self, message: impl Into<String>) {
        self.flash_message = message.into();
    }

    /// Server messages go to the flash area verbatim; errors without a
    /// server message show their own description.
    fn flash_error(&mut self, error: &ApiError) {
        match error {
            ApiError::Server { message, .. } => self.flash_message = message.clone(),
            other => self.flash_message = other.to_string(),
        }
    }

    /// The single update path: every finished request lands here.
    pub fn apply(&mut self, completion: Completion) {
        if completion.seq != self.issued {
            tracing::debug!(
                seq = completion.seq,
                issued = self.issued,
                "dropping stale completion"
            );
            return;
        }

        match completion.outcome {
            Outcome::Created(Ok(customer)) => {
                self.form.fill(&customer);
                self.flash("Success");
            }
            Outcome::Created(Err(e)) => self.flash_error(&e),
            Outcome::Updated(Ok(customer)) => {
                self.form.fill(&customer);
                self.flash("Success");
            }
            Outcome::Updated(Err(e)) => self.flash_error(&e),
            // A found customer goes into the form without touching the flash
            Outcome::Retrieved(Ok(customer)) => {
                self.form.fill(&customer);
            }
            Outcome::Retrieved(Err(e)) => {
                self.form.clear_data();
                self.flash_error(&e);
            }
            Outcome::Deleted(Ok(())) => {
                self.form.clear_data();
                self.flash("Success");
            }
            // The delete response body is never read, so no server message
            Outcome::Deleted(Err(_)) => self.flash("Server error!"),
            Outcome::Activated(Ok(customer)) => {
                self.form.fill(&customer);
                self.flash("Success");
            }
            Outcome::Activated(Err(e)) => self.flash_error(&e),
            Outcome::Searched(Ok(customers)) => {
                if let Some(first) = customers.first() {
                    self.form.fill(first);
                }
                self.search_results.replace(customers);
                self.flash("Success");
            }
            Outcome::Searched(Err(e)) => self.flash_error(&e),
        }
    }
}

pub fn render_console<B: Backend>(frame: &mut Frame<B>, state: &ConsoleState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(10),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());

    render_form(frame, &state.form, chunks[0]);

    let flash = Paragraph::new(state.flash_message.as_str())
        .block(Block::default().title("Flash Message").borders(Borders::ALL));
    frame.render_widget(flash, chunks[1]);

    render_results(frame, &state.search_results, chunks[2]);

    let buttons_text = if state.form.editing {
        "Enter - Save field | Esc - Stop editing"
    } else {
        "<C> Create | <U> Update | <R> Retrieve | <D> Delete | <X> Clear | <A> Activate | <S> Search | <Enter> Edit | <Q> Quit"
    };

    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[3]);
}

pub fn handle_input(state: &mut ConsoleState) -> Result<Option<ConsoleAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => {
                if state.form.editing {
                    state.form.toggle_editing();
                } else {
                    return Ok(Some(ConsoleAction::Exit));
                }
            }
            KeyCode::Char('q') if !state.form.editing => {
                return Ok(Some(ConsoleAction::Exit));
            }
            KeyCode::Enter => {
                state.form.toggle_editing();
            }
            KeyCode::Up if !state.form.editing => {
                state.form.previous_field();
            }
            KeyCode::Down if !state.form.editing => {
                state.form.next_field();
            }
            KeyCode::Char('c') if !state.form.editing => {
                return Ok(Some(ConsoleAction::Create));
            }
            KeyCode::Char('u') if !state.form.editing => {
                return Ok(Some(ConsoleAction::Update));
            }
            KeyCode::Char('r') if !state.form.editing => {
                return Ok(Some(ConsoleAction::Retrieve));
            }
            KeyCode::Char('d') if !state.form.editing => {
                return Ok(Some(ConsoleAction::Delete));
            }
            KeyCode::Char('x') if !state.form.editing => {
                return Ok(Some(ConsoleAction::Clear));
            }
            KeyCode::Char('a') if !state.form.editing => {
                return Ok(Some(ConsoleAction::Activate));
            }
            KeyCode::Char('s') if !state.form.editing => {
                return Ok(Some(ConsoleAction::Search));
            }
            _ if state.form.editing => {
                state.form.edit_current_field(key.code);
            }
            _ => {}
        }
    }

    Ok(None)
}

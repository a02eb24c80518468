use tui::{
    backend::Backend,
    layout::{Constraint, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::models::Customer;

/// Search results. Every search replaces the whole set.
pub struct SearchResults {
    customers: Vec<Customer>,
}

impl SearchResults {
    pub fn new() -> Self {
        Self {
            customers: Vec::new(),
        }
    }

    pub fn replace(&mut self, customers: Vec<Customer>) {
        self.customers = customers;
    }

    pub fn first(&self) -> Option<&Customer> {
        self.customers.first()
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }
}

pub fn render_results<B: Backend>(frame: &mut Frame<B>, results: &SearchResults, area: Rect) {
    let header_cells = [
        "ID",
        "FirstName",
        "LastName",
        "Email id",
        "Address",
        "Phone number",
        "Card number",
        "Active",
    ]
    .iter()
    .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells)
        .style(Style::default())
        .height(1)
        .bottom_margin(1);

    let rows = results.customers().iter().map(|customer| {
        let cells = vec![
            Cell::from(customer.customer_id.clone().unwrap_or_default()),
            Cell::from(customer.firstname.as_str()),
            Cell::from(customer.lastname.as_str()),
            Cell::from(customer.email_id.as_str()),
            Cell::from(customer.address.as_str()),
            Cell::from(customer.phone_number.as_str()),
            Cell::from(customer.card_number.as_str()),
            Cell::from(if customer.active { "true" } else { "false" }),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title("Search Results").borders(Borders::ALL))
        // Sums to 92 so the seven column gaps fit.
        .widths(&[
            Constraint::Percentage(6),
            Constraint::Percentage(13),
            Constraint::Percentage(13),
            Constraint::Percentage(16),
            Constraint::Percentage(16),
            Constraint::Percentage(11),
            Constraint::Percentage(11),
            Constraint::Percentage(6),
        ]);

    frame.render_widget(table, area);
}

use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::api::SearchFilters;
use crate::models::Customer;

#[derive(Clone, PartialEq, Copy)]
pub enum FormField {
    CustomerId,
    Firstname,
    Lastname,
    EmailId,
    Address,
    PhoneNumber,
    CardNumber,
    Active,
}

/// The customer form: one text slot per named field, plus cursor state.
/// `active` holds the literal strings "true"/"false"; anything else reads
/// as false when converted back to a customer.
pub struct CustomerForm {
    pub customer_id: String,
    pub firstname: String,
    pub lastname: String,
    pub email_id: String,
    pub address: String,
    pub phone_number: String,
    pub card_number: String,
    pub active: String,
    pub current_field: FormField,
    pub editing: bool,
}

impl CustomerForm {
    pub fn new() -> Self {
        Self {
            customer_id: String::new(),
            firstname: String::new(),
            lastname: String::new(),
            email_id: String::new(),
            address: String::new(),
            phone_number: String::new(),
            card_number: String::new(),
            active: String::new(),
            current_field: FormField::CustomerId,
            editing: false,
        }
    }

    /// Overwrite every field from a service response.
    pub fn fill(&mut self, customer: &Customer) {
        self.customer_id = customer.customer_id.clone().unwrap_or_default();
        self.firstname = customer.firstname.clone();
        self.lastname = customer.lastname.clone();
        self.email_id = customer.email_id.clone();
        self.address = customer.address.clone();
        self.phone_number = customer.phone_number.clone();
        self.card_number = customer.card_number.clone();
        self.active = if customer.active {
            "true".to_string()
        } else {
            "false".to_string()
        };
    }

    /// Empty the seven data fields; the id stays put.
    pub fn clear_data(&mut self) {
        self.firstname.clear();
        self.lastname.clear();
        self.email_id.clear();
        self.address.clear();
        self.phone_number.clear();
        self.card_number.clear();
        self.active.clear();
    }

    /// Empty everything, id included.
    pub fn clear_all(&mut self) {
        self.customer_id.clear();
        self.clear_data();
    }

    /// Request body for create/update. The id is never part of it.
    pub fn to_customer(&self) -> Customer {
        Customer {
            customer_id: None,
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            email_id: self.email_id.clone(),
            address: self.address.clone(),
            phone_number: self.phone_number.clone(),
            card_number: self.card_number.clone(),
            active: self.active == "true",
        }
    }

    pub fn search_filters(&self) -> SearchFilters {
        SearchFilters {
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            email_id: self.email_id.clone(),
            phone_number: self.phone_number.clone(),
            active: self.active == "true",
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::CustomerId => FormField::Firstname,
            FormField::Firstname => FormField::Lastname,
            FormField::Lastname => FormField::EmailId,
            FormField::EmailId => FormField::Address,
            FormField::Address => FormField::PhoneNumber,
            FormField::PhoneNumber => FormField::CardNumber,
            FormField::CardNumber => FormField::Active,
            FormField::Active => FormField::CustomerId,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::CustomerId => FormField::Active,
            FormField::Firstname => FormField::CustomerId,
            FormField::Lastname => FormField::Firstname,
            FormField::EmailId => FormField::Lastname,
            FormField::Address => FormField::EmailId,
            FormField::PhoneNumber => FormField::Address,
            FormField::CardNumber => FormField::PhoneNumber,
            FormField::Active => FormField::CardNumber,
        };
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let field_value = match self.current_field {
            FormField::CustomerId => &mut self.customer_id,
            FormField::Firstname => &mut self.firstname,
            FormField::Lastname => &mut self.lastname,
            FormField::EmailId => &mut self.email_id,
            FormField::Address => &mut self.address,
            FormField::PhoneNumber => &mut self.phone_number,
            FormField::CardNumber => &mut self.card_number,
            FormField::Active => &mut self.active,
        };

        match key {
            KeyCode::Char(c) => {
                field_value.push(c);
            }
            KeyCode::Backspace => {
                field_value.pop();
            }
            _ => {}
        }
    }
}

pub fn render_form<B: Backend>(f: &mut Frame<B>, form: &CustomerForm, area: Rect) {
    let field_names = [
        "Customer ID",
        "First Name",
        "Last Name",
        "Email ID",
        "Address",
        "Phone Number",
        "Card Number",
        "Active",
    ];

    let field_values = [
        &form.customer_id,
        &form.firstname,
        &form.lastname,
        &form.email_id,
        &form.address,
        &form.phone_number,
        &form.card_number,
        &form.active,
    ];

    let items: Vec<ListItem> = field_names
        .iter()
        .zip(field_values.iter())
        .enumerate()
        .map(|(i, (name, value))| {
            let content = if i == form.current_field as usize && form.editing {
                Spans::from(vec![
                    Span::styled(
                        format!("{}: ", name),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(
                        format!("{}|", value),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                let style = if i == form.current_field as usize {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };

                Spans::from(vec![
                    Span::styled(format!("{}: ", name), style),
                    Span::raw(value.as_str()),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Customer Details"))
        .highlight_style(Style::default().fg(Color::Yellow));

    f.render_widget(form_list, area);
}

use colored::Colorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::AppError;

pub fn print_success(message: &str) {
    println!("{}", message.green());
}

pub fn print_warning(message: &str) {
    println!("{}", message.yellow());
}

pub fn print_failure(message: &str) {
    println!("{}", message.red());
}

pub fn print_table<T: Tabled>(data: &[T]) {
    if data.is_empty() {
        println!("No results.");
        return;
    }
    let table = Table::new(data).with(Style::rounded()).to_string();
    println!("{}", table);
}

pub fn print_error(err: &AppError) {
    print_failure(&err.to_string());
}

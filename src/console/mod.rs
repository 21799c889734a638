//! Interactive console front-end.
//!
//! A numbered menu over any line reader and writer. The list lives only as
//! long as the session; nothing is persisted.

use crate::models::Item;
use crate::models::coerce::{parse_leading_int, parse_number_str};
use std::io::{self, BufRead, Write};

const MENU: &str = "
  Grocery List Tracker:
  1. View grocery list
  2. Add item to grocery list
  3. Remove item from grocery list
  4. Mark item as bought
  5. Exit
";

/// A menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Show the list.
    View,
    /// Add an item.
    Add,
    /// Remove an item by number.
    Remove,
    /// Mark an item as bought by number.
    MarkBought,
    /// Leave the menu.
    Exit,
    /// Anything else.
    Invalid,
}

impl MenuChoice {
    /// Parses a menu selection. Surrounding whitespace is ignored.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "1" => Self::View,
            "2" => Self::Add,
            "3" => Self::Remove,
            "4" => Self::MarkBought,
            "5" => Self::Exit,
            _ => Self::Invalid,
        }
    }
}

/// A console session over a reader and a writer.
pub struct ConsoleSession<R, W> {
    input: R,
    output: W,
    items: Vec<Item>,
}

impl<R: BufRead, W: Write> ConsoleSession<R, W> {
    /// Creates a session with an empty list.
    pub const fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            items: Vec::new(),
        }
    }

    /// Returns the current list.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Consumes the session and returns the writer.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the menu loop until the user exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "{MENU}")?;
            let Some(line) = self.prompt("Select an option: ")? else {
                tracing::debug!("Console input closed");
                return Ok(());
            };

            let keep_going = match MenuChoice::parse(&line) {
                MenuChoice::View => {
                    self.show_list()?;
                    true
                },
                MenuChoice::Add => self.add_item()?,
                MenuChoice::Remove => self.remove_item()?,
                MenuChoice::MarkBought => self.mark_bought()?,
                MenuChoice::Exit => {
                    writeln!(self.output, "Goodbye!")?;
                    false
                },
                MenuChoice::Invalid => {
                    writeln!(self.output, "Invalid option. Please try again.")?;
                    true
                },
            };

            if !keep_going {
                return Ok(());
            }
        }
    }

    fn show_list(&mut self) -> io::Result<()> {
        if self.items.is_empty() {
            return writeln!(self.output, "Your grocery list is empty.");
        }
        writeln!(self.output, "\nYour Grocery List:")?;
        for (number, item) in (1..).zip(&self.items) {
            writeln!(self.output, "{number}. {item}")?;
        }
        Ok(())
    }

    /// Returns `false` when input ended mid-way.
    fn add_item(&mut self) -> io::Result<bool> {
        let Some(name) = self.prompt("Enter item name: ")? else {
            return Ok(false);
        };
        let Some(quantity) = self.prompt("Enter quantity: ")? else {
            return Ok(false);
        };
        let Some(price) = self.prompt("Enter price: ")? else {
            return Ok(false);
        };

        match (parse_leading_int(&quantity), parse_number_str(&price)) {
            (Some(quantity), Some(price)) => {
                writeln!(self.output, "{name} has been added to your grocery list.")?;
                tracing::info!(%name, quantity, price, "Console item added");
                self.items.push(Item::new(name, price, quantity));
            },
            _ => writeln!(self.output, "Invalid number. Item was not added.")?,
        }
        Ok(true)
    }

    fn remove_item(&mut self) -> io::Result<bool> {
        self.show_list()?;
        let Some(answer) = self.prompt("Enter the number of the item to remove: ")? else {
            return Ok(false);
        };

        match self.position(&answer) {
            Some(position) => {
                let removed = self.items.remove(position);
                writeln!(self.output, "{} has been removed from your list.", removed.name)?;
                tracing::info!(name = %removed.name, "Console item removed");
            },
            None => writeln!(self.output, "Invalid item number.")?,
        }
        Ok(true)
    }

    fn mark_bought(&mut self) -> io::Result<bool> {
        self.show_list()?;
        let Some(answer) = self.prompt("Enter the number of the item to mark as bought: ")? else {
            return Ok(false);
        };

        match self.position(&answer) {
            Some(position) => {
                let item = &mut self.items[position];
                item.bought = true;
                writeln!(self.output, "{} has been marked as bought.", item.name)?;
                tracing::info!(name = %item.name, "Console item bought");
            },
            None => writeln!(self.output, "Invalid item number.")?,
        }
        Ok(true)
    }

    /// Converts a 1-based item number to a list position.
    fn position(&self, answer: &str) -> Option<usize> {
        parse_leading_int(answer)
            .and_then(|number| usize::try_from(number).ok())
            .and_then(|number| number.checked_sub(1))
            .filter(|&position| position < self.items.len())
    }

    /// Writes `question` and reads one line, without its line ending.
    /// Returns `None` at end of input.
    fn prompt(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(script: &str) -> (Vec<Item>, String) {
        let mut session = ConsoleSession::new(Cursor::new(script.to_string()), Vec::new());
        session.run().unwrap();
        let items = session.items().to_vec();
        let output = String::from_utf8(session.into_output()).unwrap();
        (items, output)
    }

    #[test]
    fn test_menu_choice_parse() {
        assert_eq!(MenuChoice::parse("1"), MenuChoice::View);
        assert_eq!(MenuChoice::parse(" 4 "), MenuChoice::MarkBought);
        assert_eq!(MenuChoice::parse("5"), MenuChoice::Exit);
        assert_eq!(MenuChoice::parse("6"), MenuChoice::Invalid);
        assert_eq!(MenuChoice::parse(""), MenuChoice::Invalid);
    }

    #[test]
    fn test_view_empty_list() {
        let (_, output) = run_script("1\n5\n");
        assert!(output.contains("Your grocery list is empty."));
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_add_and_view() {
        let (items, output) = run_script("2\nApples\n5\n1.5\n1\n5\n");

        assert_eq!(items, vec![Item::new("Apples", 1.5, 5)]);
        assert!(output.contains("Apples has been added to your grocery list."));
        assert!(output.contains("1. Apples - Quantity: 5, Price: $1.50, Bought: No"));
    }

    #[test]
    fn test_add_rejects_bad_numbers() {
        let (items, output) = run_script("2\nApples\nmany\n1.5\n5\n");

        assert!(items.is_empty());
        assert!(output.contains("Invalid number. Item was not added."));
    }

    #[test]
    fn test_mark_bought() {
        let (items, output) = run_script("2\nMilk\n1\n0.99\n4\n1\n5\n");

        assert!(items[0].bought);
        assert!(output.contains("Milk has been marked as bought."));
    }

    #[test]
    fn test_remove_item() {
        let (items, output) = run_script("2\nMilk\n1\n0.99\n2\nBread\n1\n2.50\n3\n1\n5\n");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Bread");
        assert!(output.contains("Milk has been removed from your list."));
    }

    #[test]
    fn test_invalid_item_numbers() {
        let (items, output) = run_script("2\nMilk\n1\n0.99\n3\n0\n4\n9\n3\nx\n5\n");

        assert_eq!(items.len(), 1);
        assert_eq!(output.matches("Invalid item number.").count(), 3);
    }

    #[test]
    fn test_invalid_option() {
        let (_, output) = run_script("7\n5\n");
        assert!(output.contains("Invalid option. Please try again."));
    }

    #[test]
    fn test_end_of_input_stops_session() {
        let (items, output) = run_script("2\nApples\n");

        assert!(items.is_empty());
        assert!(!output.contains("Goodbye!"));
    }
}

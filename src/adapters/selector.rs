use crate::domain::model::CustomerId;
use crate::domain::ports::CustomerSelector;
use crate::utils::error::{DashboardError, Result};
use std::io::{BufRead, Write};

/// Configured customer if given, otherwise the first one in the dataset.
#[derive(Debug, Clone, Default)]
pub struct DefaultSelector {
    preferred: Option<CustomerId>,
}

impl DefaultSelector {
    pub fn new(preferred: Option<CustomerId>) -> Self {
        Self { preferred }
    }
}

impl CustomerSelector for DefaultSelector {
    fn select(&mut self, ids: &[CustomerId]) -> Result<CustomerId> {
        let first = ids.first().ok_or(DashboardError::EmptyDataset)?;

        match &self.preferred {
            Some(preferred) if ids.contains(preferred) => Ok(preferred.clone()),
            Some(preferred) => Err(DashboardError::CustomerNotFound {
                customer_id: preferred.to_string(),
            }),
            None => Ok(first.clone()),
        }
    }
}

/// Line-based prompt: lists IDs, reads a 1-based number or an exact ID.
pub struct PromptSelector<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// `None` once the user quits (blank line, `q`, `quit`) or input ends.
    pub fn next_choice(
        &mut self,
        ids: &[CustomerId],
        current: Option<&CustomerId>,
    ) -> Result<Option<CustomerId>> {
        if ids.is_empty() {
            return Err(DashboardError::EmptyDataset);
        }

        writeln!(self.output, "Select a Customer")?;
        for (position, id) in ids.iter().enumerate() {
            let marker = if Some(id) == current { '*' } else { ' ' };
            writeln!(self.output, "{} {:>3}. {}", marker, position + 1, id)?;
        }

        loop {
            write!(self.output, "Customer ID (number or ID, blank to quit): ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            let answer = line.trim();
            if answer.is_empty() || answer.eq_ignore_ascii_case("q") || answer.eq_ignore_ascii_case("quit") {
                return Ok(None);
            }

            match resolve_choice(ids, answer) {
                Ok(id) => return Ok(Some(id)),
                Err(e) => {
                    tracing::debug!("Rejected selection input '{}': {}", answer, e);
                    writeln!(self.output, "{}", e.user_friendly_message())?;
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> CustomerSelector for PromptSelector<R, W> {
    fn select(&mut self, ids: &[CustomerId]) -> Result<CustomerId> {
        match self.next_choice(ids, None)? {
            Some(id) => Ok(id),
            None => ids.first().cloned().ok_or(DashboardError::EmptyDataset),
        }
    }
}

fn resolve_choice(ids: &[CustomerId], answer: &str) -> Result<CustomerId> {
    // 完全相符的 ID 優先於序號
    if let Some(id) = ids.iter().find(|id| id.as_str() == answer) {
        return Ok(id.clone());
    }

    if let Ok(number) = answer.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|index| ids.get(index))
            .cloned()
            .ok_or_else(|| DashboardError::SelectionError {
                message: format!("Choose a number between 1 and {}", ids.len()),
            });
    }

    Err(DashboardError::CustomerNotFound {
        customer_id: answer.to_string(),
    })
}

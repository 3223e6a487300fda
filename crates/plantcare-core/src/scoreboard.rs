use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::Store;
use crate::types::{Task, Zone};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub employee_name: String,
    pub completed: usize,
}

/// Resolved-task count per employee, highest first, ties by name.
pub fn scoreboard(store: &Store) -> Result<Vec<ScoreEntry>> {
    Ok(tally(&store.list_all::<Task>()?))
}

fn tally(tasks: &[Task]) -> Vec<ScoreEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for task in tasks.iter().filter(|t| t.resolved) {
        *counts.entry(task.employee_name.as_str()).or_default() += 1;
    }
    let mut entries: Vec<ScoreEntry> = counts
        .into_iter()
        .map(|(name, completed)| ScoreEntry {
            employee_name: name.to_string(),
            completed,
        })
        .collect();
    entries.sort_by(|a, b| {
        b.completed
            .cmp(&a.completed)
            .then_with(|| a.employee_name.cmp(&b.employee_name))
    });
    entries
}

/// Every employee on any zone roster, deduplicated, in first-seen order.
///
/// Zones are visited in name order so the result is stable between calls.
pub fn employee_names(store: &Store) -> Result<Vec<String>> {
    let mut zones = store.list_all::<Zone>()?;
    zones.sort_by(|a, b| a.name.cmp(&b.name).then(a.uuid.cmp(&b.uuid)));

    let mut names: Vec<String> = Vec::new();
    for zone in zones {
        for employee in zone.employees {
            if !names.contains(&employee) {
                names.push(employee);
            }
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::create_zone;
    use crate::duty::DutyCheck;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn task(employee: &str, resolved: bool) -> Task {
        let mut t = Task::new(
            Uuid::new_v4(),
            employee,
            DutyCheck {
                water: true,
                sun: false,
            },
            NaiveDate::from_ymd_opt(2026, 3, 12).unwrap(),
        );
        t.resolved = resolved;
        t
    }

    #[test]
    fn counts_only_resolved_tasks() {
        let store = Store::open_in_memory().unwrap();
        for t in [
            task("Bob", true),
            task("Alice", true),
            task("Alice", true),
            task("Alice", false),
            task("Carol", false),
        ] {
            store.put(&t).unwrap();
        }

        let board = scoreboard(&store).unwrap();
        assert_eq!(
            board,
            vec![
                ScoreEntry {
                    employee_name: "Alice".into(),
                    completed: 2
                },
                ScoreEntry {
                    employee_name: "Bob".into(),
                    completed: 1
                },
            ]
        );
    }

    #[test]
    fn ties_are_ordered_by_name() {
        let board = tally(&[task("Zoe", true), task("Adam", true)]);
        assert_eq!(board[0].employee_name, "Adam");
        assert_eq!(board[1].employee_name, "Zoe");
    }

    #[test]
    fn empty_store_has_empty_board() {
        let store = Store::open_in_memory().unwrap();
        assert!(scoreboard(&store).unwrap().is_empty());
        assert!(employee_names(&store).unwrap().is_empty());
    }

    #[test]
    fn employee_names_are_deduplicated() {
        let store = Store::open_in_memory().unwrap();
        create_zone(&store, "A-Kitchen", vec!["Alice".into(), "Bob".into()]).unwrap();
        create_zone(&store, "B-Lobby", vec!["Bob".into(), "Carol".into()]).unwrap();
        assert_eq!(employee_names(&store).unwrap(), ["Alice", "Bob", "Carol"]);
    }
}

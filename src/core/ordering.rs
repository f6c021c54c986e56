//! Sibling ordering engine
//!
//! Vehicles, the places of a vehicle and the items of a place each form a
//! sibling set whose display order is an explicit integer `sort` key.
//! New records append at the end; `shift` exchanges a record with its
//! positional neighbor. Both operations must run inside the transaction
//! that persists their effect, so concurrent appends cannot collide on the
//! same sort value.

use rusqlite::{params, Transaction};

/// Move direction for `shift`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// One sibling set: all vehicles, the places of one vehicle, or the items
/// of one place.
#[derive(Debug, Clone, Copy)]
pub struct SiblingScope {
    table: &'static str,
    parent: Option<(&'static str, i64)>,
}

impl SiblingScope {
    pub fn vehicles() -> Self {
        Self {
            table: "vehicles",
            parent: None,
        }
    }

    pub fn places_of(vehicle_id: i64) -> Self {
        Self {
            table: "places",
            parent: Some(("vehicle_id", vehicle_id)),
        }
    }

    pub fn items_of(place_id: i64) -> Self {
        Self {
            table: "items",
            parent: Some(("place_id", place_id)),
        }
    }

    fn filter(&self) -> String {
        match self.parent {
            Some((column, _)) => format!(" WHERE {column} = ?1"),
            None => String::new(),
        }
    }
}

/// Compute the sort value that lands a new record last among its siblings.
///
/// Must be called inside the transaction that performs the insert.
pub fn next_sort(tx: &Transaction<'_>, scope: &SiblingScope) -> rusqlite::Result<i64> {
    let sql = format!(
        "SELECT COALESCE(MAX(sort), 0) + 1 FROM {}{}",
        scope.table,
        scope.filter()
    );
    match scope.parent {
        Some((_, parent_id)) => tx.query_row(&sql, params![parent_id], |row| row.get(0)),
        None => tx.query_row(&sql, [], |row| row.get(0)),
    }
}

/// Exchange a record with its positional neighbor in the sibling order.
///
/// Siblings are ranked by `(sort, name, id)` and the target swaps places
/// with the adjacent element, so gaps or ties in `sort` never break
/// adjacency. Every sibling whose rank changed is re-persisted, which also
/// heals ties left behind by legacy data. Returns `false` (and writes
/// nothing) when the record is already first (up) or last (down), or when
/// the id is not part of the scope.
pub fn shift(
    tx: &Transaction<'_>,
    scope: &SiblingScope,
    id: i64,
    direction: Direction,
) -> rusqlite::Result<bool> {
    let sql = format!(
        "SELECT id, sort FROM {}{} ORDER BY sort, name, id",
        scope.table,
        scope.filter()
    );
    let mut stmt = tx.prepare(&sql)?;
    let siblings: Vec<(i64, i64)> = match scope.parent {
        Some((_, parent_id)) => stmt
            .query_map(params![parent_id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<_, _>>()?,
        None => stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<_, _>>()?,
    };

    let Some(position) = siblings.iter().position(|&(sid, _)| sid == id) else {
        return Ok(false);
    };
    let neighbor = match direction {
        Direction::Up => {
            if position == 0 {
                return Ok(false);
            }
            position - 1
        }
        Direction::Down => {
            if position + 1 >= siblings.len() {
                return Ok(false);
            }
            position + 1
        }
    };

    let mut order: Vec<i64> = siblings.iter().map(|&(sid, _)| sid).collect();
    order.swap(position, neighbor);

    let update = format!("UPDATE {} SET sort = ?1 WHERE id = ?2", scope.table);
    let mut update_stmt = tx.prepare(&update)?;
    for (index, sid) in order.iter().enumerate() {
        let want = (index + 1) as i64;
        let have = siblings
            .iter()
            .find(|&&(cid, _)| cid == *sid)
            .map(|&(_, sort)| sort)
            .unwrap_or(0);
        if have != want {
            update_stmt.execute(params![want, sid])?;
        }
    }

    Ok(true)
}

use crate::{Face, GameSnapshot};

/// Number of cards per row when the table is laid out as a grid.
pub const GRID_COLUMNS: usize = 5;

/// Renders the table as a small text grid, e.g. for log output.
///
/// Hidden cards are drawn as `??`, revealed cards with the first two letters
/// of the character's name, matched cards with `--`.
pub fn visualize_table(snapshot: &GameSnapshot) -> String {
    let mut result = String::from("╭");
    for _ in 0..GRID_COLUMNS {
        result += "───";
    }
    result += "╮";

    for row in snapshot.cards.chunks(GRID_COLUMNS) {
        result += "\n│";
        for view in row {
            let label: String = match (view.face, &view.character) {
                (Face::Revealed, Some(character)) => character.name.chars().take(2).collect(),
                (Face::Matched, _) => String::from("--"),
                _ => String::from("??"),
            };
            result += &format!("{:<2} ", label);
        }
        for _ in row.len()..GRID_COLUMNS {
            result += "   ";
        }
        result += "│";
    }

    result += "\n╰";
    for _ in 0..GRID_COLUMNS {
        result += "───";
    }
    result += &format!(
        "╯\nscores {}:{}, player {} to move",
        snapshot.scores[0],
        snapshot.scores[1],
        snapshot.current_player_idx + 1
    );
    result
}

//! The move engine: legal destinations, bumps, slides, Sorry! and swaps.
//!
//! Everything here is a plain function over a [`Board`] and a [`PawnSet`].
//! Move computation never touches the session; only the `apply_*`
//! functions mutate, and only the pawn set they are handed. The turn
//! coordinator, client-side prediction, and AI players all call the same
//! functions, so there is exactly one definition of what a legal move is.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Slide, SAFETY_LEN, TRACK_LEN};
use crate::card::CardRank;
use crate::pawn::{Pawn, PawnKey, PawnSet, Position};
use crate::TurnError;

/// What a move is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveBasis {
    /// A freshly drawn card, with all of its rank-specific rules.
    Card(CardRank),
    /// An exact forward step count (the remainder of a split 7).
    Steps(u8),
}

/// One legal destination for a pawn.
///
/// `steps` is only set for rank-7 and split-remainder moves; `bumps` names
/// the opponent that would be sent home by landing here (slides may bump
/// more).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOption {
    #[serde(flatten)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bumps: Option<PawnKey>,
}

impl MoveOption {
    /// Returns `true` if a client request for `position` / `steps` picks
    /// this option. Steps only matter for options that carry them.
    pub fn matches(&self, position: Position, steps: Option<u8>) -> bool {
        self.position == position && (self.steps.is_none() || self.steps == steps)
    }
}

/// What happened when a move was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    /// Where the mover finally came to rest (after any slide).
    pub landed: Position,
    /// Every pawn sent back to start, in the order they were bumped.
    pub bumped: Vec<PawnKey>,
    /// The slide taken, if any.
    pub slide: Option<Slide>,
}

// ---------------------------------------------------------------------------
// Legal moves
// ---------------------------------------------------------------------------

/// Computes every legal destination for pawn `key`.
///
/// Returns an empty list when the pawn cannot move (or does not exist).
/// Sorry! never produces moves here: it is a target selection, see
/// [`sorry_targets`].
pub fn legal_moves(
    board: &Board,
    pawns: &PawnSet,
    key: PawnKey,
    basis: MoveBasis,
) -> Vec<MoveOption> {
    let Some(pawn) = pawns.get(key) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut push = |dest: Option<Position>, steps: Option<u8>| {
        if let Some(dest) = dest {
            out.push(option_for(pawns, pawn, dest, steps));
        }
    };

    match (pawn.position, basis) {
        (Position::Home, _) => {}
        (Position::Start, MoveBasis::Card(rank)) if rank.leaves_start() => {
            push(leave_start(board, pawns, pawn), None);
        }
        (Position::Start, _) => {}
        (_, MoveBasis::Steps(n)) => push(forward(board, pawns, pawn, n), Some(n)),
        (_, MoveBasis::Card(CardRank::Seven)) => {
            for steps in 1..=7 {
                push(forward(board, pawns, pawn, steps), Some(steps));
            }
        }
        (Position::Safe(_), MoveBasis::Card(CardRank::Four)) => {
            push(forward(board, pawns, pawn, 4), None);
            push(backward(board, pawns, pawn, 4), None);
        }
        (_, MoveBasis::Card(CardRank::Four)) => push(backward(board, pawns, pawn, 4), None),
        (_, MoveBasis::Card(CardRank::Ten)) => {
            push(forward(board, pawns, pawn, 10), None);
            push(backward(board, pawns, pawn, 1), None);
        }
        (_, MoveBasis::Card(CardRank::Sorry)) => {}
        (_, MoveBasis::Card(rank)) => {
            if let Some(value) = rank.value() {
                push(forward(board, pawns, pawn, value), None);
            }
        }
    }

    out
}

/// Seat-local ids of `player`'s pawns that have at least one legal move.
pub fn movable_pawns(
    board: &Board,
    pawns: &PawnSet,
    player: usize,
    basis: MoveBasis,
) -> Vec<usize> {
    pawns
        .of_player(player)
        .filter(|p| !legal_moves(board, pawns, p.key(), basis).is_empty())
        .map(|p| p.id)
        .collect()
}

fn option_for(pawns: &PawnSet, mover: &Pawn, dest: Position, steps: Option<u8>) -> MoveOption {
    let bumps = dest
        .track_index()
        .and_then(|i| other_occupant(pawns, i, mover.key()))
        .map(|p| p.key());
    MoveOption {
        position: dest,
        steps,
        bumps,
    }
}

fn leave_start(board: &Board, pawns: &PawnSet, pawn: &Pawn) -> Option<Position> {
    let exit = board.track_position(pawn.player, board.exit_index(pawn.player));
    unblocked(pawns, pawn, exit)
}

/// Forward-stepping: walks `steps` cells and returns the destination.
///
/// On the track the pawn may not pass its own safety entry without
/// landing on it, and may not step over its own pawns. From the entry the
/// first step turns into the lane. In the lane there is no overshoot.
pub fn forward(board: &Board, pawns: &PawnSet, pawn: &Pawn, steps: u8) -> Option<Position> {
    if steps == 0 {
        return None;
    }

    let dest = match pawn.position {
        Position::Start | Position::Home => return None,
        Position::Safe(lane) => lane_destination(lane + steps)?,
        Position::Entry(_) => lane_destination(steps - 1)?,
        Position::Board(from) => {
            let entry = board.safety_entry_index(pawn.player);
            let mut cell = from;
            for step in 1..=steps {
                cell = (cell + 1) % TRACK_LEN;
                if step == steps {
                    break;
                }
                if cell == entry {
                    return None;
                }
                if pawns.own_blocker(pawn.player, Position::Board(cell)).is_some() {
                    return None;
                }
            }
            board.track_position(pawn.player, cell)
        }
    };

    unblocked(pawns, pawn, dest)
}

/// Moves backward `steps` cells: a direct jump on the track (wrapping),
/// or within the lane when the lane index allows it.
pub fn backward(board: &Board, pawns: &PawnSet, pawn: &Pawn, steps: u8) -> Option<Position> {
    let dest = match pawn.position {
        Position::Board(i) | Position::Entry(i) => {
            let back = steps % TRACK_LEN;
            board.track_position(pawn.player, (i + TRACK_LEN - back) % TRACK_LEN)
        }
        Position::Safe(lane) if lane >= steps => Position::Safe(lane - steps),
        _ => return None,
    };
    unblocked(pawns, pawn, dest)
}

fn lane_destination(lane: u8) -> Option<Position> {
    match lane.cmp(&SAFETY_LEN) {
        std::cmp::Ordering::Less => Some(Position::Safe(lane)),
        std::cmp::Ordering::Equal => Some(Position::Home),
        std::cmp::Ordering::Greater => None,
    }
}

fn unblocked(pawns: &PawnSet, pawn: &Pawn, dest: Position) -> Option<Position> {
    match pawns.own_blocker(pawn.player, dest) {
        Some(blocker) if blocker.key() != pawn.key() => None,
        _ => Some(dest),
    }
}

fn other_occupant(pawns: &PawnSet, index: u8, mover: PawnKey) -> Option<&Pawn> {
    pawns
        .iter()
        .find(|p| p.key() != mover && p.position.track_index() == Some(index))
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// Opponents a Sorry! card can replace: every opponent pawn on the track.
pub fn sorry_targets(pawns: &PawnSet, player: usize) -> Vec<PawnKey> {
    pawns.opponents_on_track(player).map(Pawn::key).collect()
}

/// Opponents pawn `key` can swap with on an 11. Empty unless the pawn
/// itself is on the track.
pub fn swap_targets(pawns: &PawnSet, key: PawnKey) -> Vec<PawnKey> {
    match pawns.get(key) {
        Some(pawn) if pawn.position.is_on_track() => sorry_targets(pawns, key.player),
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Applying moves
// ---------------------------------------------------------------------------

fn missing(key: PawnKey) -> TurnError {
    TurnError::Internal(format!("{key} does not exist"))
}

fn bump(pawns: &mut PawnSet, victim: PawnKey, report: &mut MoveReport) {
    pawns.place(victim, Position::Start);
    report.bumped.push(victim);
}

/// Moves pawn `key` to `dest`, bumping whoever was there and resolving a
/// foreign slide.
///
/// `dest` is trusted to be a legal destination; this function does not
/// re-check move legality.
pub fn apply_move(
    board: &Board,
    pawns: &mut PawnSet,
    key: PawnKey,
    dest: Position,
) -> Result<MoveReport, TurnError> {
    pawns.get(key).ok_or_else(|| missing(key))?;

    let mut report = MoveReport {
        landed: dest,
        bumped: Vec::new(),
        slide: None,
    };

    let Some(cell) = dest.track_index() else {
        pawns.place(key, dest);
        return Ok(report);
    };

    if let Some(victim) = other_occupant(pawns, cell, key).map(Pawn::key) {
        bump(pawns, victim, &mut report);
    }
    pawns.place(key, dest);

    let slide = board
        .slide_at(cell)
        .filter(|s| s.owner.player() != key.player)
        .copied();
    if let Some(slide) = slide {
        for swept in slide.swept_cells() {
            while let Some(victim) = other_occupant(pawns, swept, key).map(Pawn::key) {
                bump(pawns, victim, &mut report);
            }
        }
        let landed = board.track_position(key.player, slide.end_index);
        pawns.place(key, landed);
        // Anything still sharing the end cell is inconsistent data; clear it.
        while let Some(victim) = other_occupant(pawns, slide.end_index, key).map(Pawn::key) {
            tracing::warn!(%victim, cell = slide.end_index, "pawn left on slide end");
            bump(pawns, victim, &mut report);
        }
        report.landed = landed;
        report.slide = Some(slide);
    }

    Ok(report)
}

/// Sorry!: the actor (from start) takes the target's exact track cell and
/// the target goes back to start.
pub fn apply_sorry(
    board: &Board,
    pawns: &mut PawnSet,
    actor: PawnKey,
    target: PawnKey,
) -> Result<Position, TurnError> {
    pawns.get(actor).ok_or_else(|| missing(actor))?;
    let cell = pawns
        .get(target)
        .ok_or_else(|| missing(target))?
        .position
        .track_index()
        .ok_or(TurnError::InvalidTarget(target))?;

    let landed = board.track_position(actor.player, cell);
    pawns.place(target, Position::Start);
    pawns.place(actor, landed);
    Ok(landed)
}

/// Swap on an 11: the two pawns exchange track cells.
pub fn apply_swap(
    board: &Board,
    pawns: &mut PawnSet,
    actor: PawnKey,
    target: PawnKey,
) -> Result<(Position, Position), TurnError> {
    let actor_cell = pawns
        .get(actor)
        .ok_or_else(|| missing(actor))?
        .position
        .track_index()
        .ok_or_else(|| TurnError::Internal(format!("{actor} is not on the track")))?;
    let target_cell = pawns
        .get(target)
        .ok_or_else(|| missing(target))?
        .position
        .track_index()
        .ok_or(TurnError::InvalidTarget(target))?;

    let actor_to = board.track_position(actor.player, target_cell);
    let target_to = board.track_position(target.player, actor_cell);
    pawns.place(actor, actor_to);
    pawns.place(target, target_to);
    Ok((actor_to, target_to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> &'static Board {
        Board::standard()
    }

    fn key(player: usize, id: usize) -> PawnKey {
        PawnKey::new(player, id)
    }

    fn set_with(placements: &[(PawnKey, Position)]) -> PawnSet {
        let mut pawns = PawnSet::new();
        for (k, pos) in placements {
            pawns.place(*k, *pos);
        }
        pawns
    }

    fn destinations(moves: &[MoveOption]) -> Vec<Position> {
        moves.iter().map(|m| m.position).collect()
    }

    fn card(rank: CardRank) -> MoveBasis {
        MoveBasis::Card(rank)
    }

    // =====================================================================
    // Leaving start
    // =====================================================================

    #[test]
    fn test_start_leaves_only_on_one_or_two() {
        let pawns = PawnSet::new();
        for rank in CardRank::ALL {
            let moves = legal_moves(board(), &pawns, key(0, 0), card(rank));
            if rank.leaves_start() {
                assert_eq!(destinations(&moves), vec![Position::Board(4)], "rank {rank}");
            } else {
                assert!(moves.is_empty(), "rank {rank}");
            }
        }
    }

    #[test]
    fn test_start_blocked_by_own_pawn_on_exit() {
        let pawns = set_with(&[(key(1, 0), Position::Board(19))]);
        let moves = legal_moves(board(), &pawns, key(1, 1), card(CardRank::One));
        assert!(moves.is_empty());
    }

    #[test]
    fn test_start_onto_opponent_bumps() {
        let pawns = set_with(&[(key(2, 3), Position::Board(4))]);
        let moves = legal_moves(board(), &pawns, key(0, 0), card(CardRank::Two));
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].bumps, Some(key(2, 3)));
    }

    // =====================================================================
    // Forward stepping on the track
    // =====================================================================

    #[test]
    fn test_forward_wraps_past_59() {
        let pawns = set_with(&[(key(1, 0), Position::Board(58))]);
        let moves = legal_moves(board(), &pawns, key(1, 0), card(CardRank::Two));
        assert_eq!(destinations(&moves), vec![Position::Board(0)]);
    }

    #[test]
    fn test_forward_landing_on_own_entry_is_entry() {
        let pawns = set_with(&[(key(0, 0), Position::Board(59))]);
        let moves = legal_moves(board(), &pawns, key(0, 0), card(CardRank::Three));
        assert_eq!(destinations(&moves), vec![Position::Entry(2)]);
    }

    #[test]
    fn test_forward_cannot_pass_own_entry() {
        let pawns = set_with(&[(key(0, 0), Position::Board(59))]);
        let moves = legal_moves(board(), &pawns, key(0, 0), card(CardRank::Five));
        assert!(moves.is_empty());
    }

    #[test]
    fn test_forward_passes_foreign_entry() {
        // Player 1 walks straight over player 0's entry at 2.
        let pawns = set_with(&[(key(1, 0), Position::Board(0))]);
        let moves = legal_moves(board(), &pawns, key(1, 0), card(CardRank::Five));
        assert_eq!(destinations(&moves), vec![Position::Board(5)]);
    }

    #[test]
    fn test_forward_blocked_by_own_pawn_mid_path() {
        let pawns = set_with(&[
            (key(0, 0), Position::Board(20)),
            (key(0, 1), Position::Board(22)),
        ]);
        let moves = legal_moves(board(), &pawns, key(0, 0), card(CardRank::Five));
        assert!(moves.is_empty());
    }

    #[test]
    fn test_forward_blocked_by_own_pawn_on_final_cell() {
        let pawns = set_with(&[
            (key(0, 0), Position::Board(20)),
            (key(0, 1), Position::Board(23)),
        ]);
        let moves = legal_moves(board(), &pawns, key(0, 0), card(CardRank::Three));
        assert!(moves.is_empty());
    }

    #[test]
    fn test_forward_over_opponent_mid_path_is_fine() {
        let pawns = set_with(&[
            (key(0, 0), Position::Board(20)),
            (key(3, 1), Position::Board(22)),
        ]);
        let moves = legal_moves(board(), &pawns, key(0, 0), card(CardRank::Five));
        assert_eq!(destinations(&moves), vec![Position::Board(25)]);
        assert_eq!(moves[0].bumps, None);
    }

    // =====================================================================
    // Backward moves
    // =====================================================================

    #[test]
    fn test_four_moves_backward_with_wrap() {
        let pawns = set_with(&[(key(1, 0), Position::Board(2))]);
        let moves = legal_moves(board(), &pawns, key(1, 0), card(CardRank::Four));
        assert_eq!(destinations(&moves), vec![Position::Board(58)]);
    }

    #[test]
    fn test_four_backward_ignores_intermediate_cells() {
        let pawns = set_with(&[
            (key(1, 0), Position::Board(30)),
            (key(1, 1), Position::Board(28)),
        ]);
        let moves = legal_moves(board(), &pawns, key(1, 0), card(CardRank::Four));
        assert_eq!(destinations(&moves), vec![Position::Board(26)]);
    }

    #[test]
    fn test_four_backward_onto_own_entry_is_entry() {
        let pawns = set_with(&[(key(0, 0), Position::Board(6))]);
        let moves = legal_moves(board(), &pawns, key(0, 0), card(CardRank::Four));
        assert_eq!(destinations(&moves), vec![Position::Entry(2)]);
    }

    #[test]
    fn test_ten_offers_forward_and_back_one() {
        let pawns = set_with(&[(key(2, 0), Position::Board(40))]);
        let moves = legal_moves(board(), &pawns, key(2, 0), card(CardRank::Ten));
        assert_eq!(
            destinations(&moves),
            vec![Position::Board(50), Position::Board(39)]
        );
    }

    #[test]
    fn test_ten_back_one_blocked_by_own_pawn() {
        let pawns = set_with(&[
            (key(2, 0), Position::Board(40)),
            (key(2, 1), Position::Board(39)),
        ]);
        let moves = legal_moves(board(), &pawns, key(2, 0), card(CardRank::Ten));
        assert_eq!(destinations(&moves), vec![Position::Board(50)]);
    }

    // =====================================================================
    // Safety lane
    // =====================================================================

    #[test]
    fn test_lane_exact_count_reaches_home() {
        let pawns = set_with(&[(key(0, 0), Position::Safe(3))]);
        let moves = legal_moves(board(), &pawns, key(0, 0), card(CardRank::Two));
        assert_eq!(destinations(&moves), vec![Position::Home]);
    }

    #[test]
    fn test_lane_overshoot_is_illegal() {
        let pawns = set_with(&[(key(0, 0), Position::Safe(3))]);
        let moves = legal_moves(board(), &pawns, key(0, 0), card(CardRank::Three));
        assert!(moves.is_empty());
    }

    #[test]
    fn test_lane_blocked_by_own_pawn() {
        let pawns = set_with(&[
            (key(0, 0), Position::Safe(1)),
            (key(0, 1), Position::Safe(2)),
        ]);
        let moves = legal_moves(board(), &pawns, key(0, 0), card(CardRank::One));
        assert!(moves.is_empty());
    }

    #[test]
    fn test_lane_backward_rules() {
        let pawns = set_with(&[(key(0, 0), Position::Safe(4)), (key(0, 1), Position::Safe(2))]);
        let four = legal_moves(board(), &pawns, key(0, 0), card(CardRank::Four));
        assert_eq!(destinations(&four), vec![Position::Safe(0)]);

        let four_low = legal_moves(board(), &pawns, key(0, 1), card(CardRank::Four));
        assert!(four_low.is_empty());

        let ten = legal_moves(board(), &pawns, key(0, 1), card(CardRank::Ten));
        assert_eq!(destinations(&ten), vec![Position::Safe(1)]);
    }

    #[test]
    fn test_lane_four_also_moves_forward() {
        let pawns = set_with(&[(key(0, 0), Position::Safe(0)), (key(0, 1), Position::Safe(1))]);
        let from_zero = legal_moves(board(), &pawns, key(0, 0), card(CardRank::Four));
        assert_eq!(destinations(&from_zero), vec![Position::Safe(4)]);

        let from_one = legal_moves(board(), &pawns, key(0, 1), card(CardRank::Four));
        assert_eq!(destinations(&from_one), vec![Position::Home]);
    }

    #[test]
    fn test_four_on_entry_is_backward_only() {
        let pawns = set_with(&[(key(0, 0), Position::Entry(2))]);
        let moves = legal_moves(board(), &pawns, key(0, 0), card(CardRank::Four));
        assert_eq!(destinations(&moves), vec![Position::Board(58)]);
    }

    #[test]
    fn test_entry_turns_into_lane() {
        let pawns = set_with(&[(key(3, 0), Position::Entry(47))]);
        let three = legal_moves(board(), &pawns, key(3, 0), card(CardRank::Three));
        assert_eq!(destinations(&three), vec![Position::Safe(2)]);

        let five = legal_moves(board(), &pawns, key(3, 0), card(CardRank::Five));
        assert_eq!(destinations(&five), vec![Position::Safe(4)]);

        let eight = legal_moves(board(), &pawns, key(3, 0), card(CardRank::Eight));
        assert!(eight.is_empty());
    }

    // =====================================================================
    // Seven and split remainders
    // =====================================================================

    #[test]
    fn test_seven_offers_every_step_count() {
        let pawns = set_with(&[(key(1, 0), Position::Board(30))]);
        let moves = legal_moves(board(), &pawns, key(1, 0), card(CardRank::Seven));
        let steps: Vec<u8> = moves.iter().filter_map(|m| m.steps).collect();
        assert_eq!(steps, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(moves[6].position, Position::Board(37));
    }

    #[test]
    fn test_seven_from_lane_stops_at_home() {
        let pawns = set_with(&[(key(1, 0), Position::Safe(2))]);
        let moves = legal_moves(board(), &pawns, key(1, 0), card(CardRank::Seven));
        assert_eq!(
            destinations(&moves),
            vec![Position::Safe(3), Position::Safe(4), Position::Home]
        );
    }

    #[test]
    fn test_steps_basis_is_exact() {
        let pawns = set_with(&[(key(1, 0), Position::Board(30))]);
        let moves = legal_moves(board(), &pawns, key(1, 0), MoveBasis::Steps(3));
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].position, Position::Board(33));
        assert_eq!(moves[0].steps, Some(3));
    }

    #[test]
    fn test_movable_pawns_lists_ids() {
        let pawns = set_with(&[(key(1, 0), Position::Board(30)), (key(1, 2), Position::Safe(4))]);
        let ids = movable_pawns(board(), &pawns, 1, card(CardRank::Three));
        assert_eq!(ids, vec![0]);
    }

    // =====================================================================
    // Applying moves, slides, Sorry!, swap
    // =====================================================================

    #[test]
    fn test_apply_move_bumps_opponent() {
        let mut pawns = set_with(&[
            (key(0, 0), Position::Board(20)),
            (key(1, 0), Position::Board(23)),
        ]);
        let report = apply_move(board(), &mut pawns, key(0, 0), Position::Board(23)).unwrap();
        assert_eq!(report.bumped, vec![key(1, 0)]);
        assert_eq!(pawns.get(key(1, 0)).unwrap().position, Position::Start);
        assert_eq!(pawns.get(key(0, 0)).unwrap().position, Position::Board(23));
    }

    #[test]
    fn test_foreign_slide_moves_to_end_and_clears_path() {
        // Blue's short slide: 16 → 19.
        let mut pawns = set_with(&[
            (key(0, 0), Position::Board(14)),
            (key(1, 1), Position::Board(17)),
            (key(0, 2), Position::Board(18)),
            (key(3, 0), Position::Board(19)),
        ]);
        let report = apply_move(board(), &mut pawns, key(0, 0), Position::Board(16)).unwrap();

        assert_eq!(report.landed, Position::Board(19));
        assert_eq!(report.slide.map(|s| s.start), Some(16));
        assert_eq!(pawns.get(key(0, 0)).unwrap().position, Position::Board(19));
        for victim in [key(1, 1), key(0, 2), key(3, 0)] {
            assert_eq!(pawns.get(victim).unwrap().position, Position::Start, "{victim}");
            assert!(report.bumped.contains(&victim));
        }
    }

    #[test]
    fn test_own_slide_does_not_slide() {
        let mut pawns = set_with(&[(key(1, 0), Position::Board(14))]);
        let report = apply_move(board(), &mut pawns, key(1, 0), Position::Board(16)).unwrap();
        assert_eq!(report.slide, None);
        assert_eq!(report.landed, Position::Board(16));
    }

    #[test]
    fn test_apply_move_missing_pawn_is_internal() {
        let mut pawns = PawnSet::new();
        let err = apply_move(board(), &mut pawns, key(7, 0), Position::Board(1)).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_sorry_takes_exact_cell_regardless_of_distance() {
        for cell in [5u8, 31, 58] {
            let mut pawns = set_with(&[(key(2, 1), Position::Board(cell))]);
            let landed = apply_sorry(board(), &mut pawns, key(0, 0), key(2, 1)).unwrap();
            assert_eq!(landed, Position::Board(cell));
            assert_eq!(pawns.get(key(0, 0)).unwrap().position, Position::Board(cell));
            assert_eq!(pawns.get(key(2, 1)).unwrap().position, Position::Start);
        }
    }

    #[test]
    fn test_sorry_targets_only_opponents_on_track() {
        let pawns = set_with(&[
            (key(1, 0), Position::Board(10)),
            (key(1, 1), Position::Safe(1)),
            (key(0, 1), Position::Board(12)),
            (key(3, 2), Position::Entry(47)),
        ]);
        let targets = sorry_targets(&pawns, 0);
        assert_eq!(targets, vec![key(1, 0), key(3, 2)]);
    }

    #[test]
    fn test_swap_exchanges_cells_and_normalizes_entry() {
        // Player 0 on 30 swaps with player 1 standing on 2 (player 0's entry).
        let mut pawns = set_with(&[
            (key(0, 0), Position::Board(30)),
            (key(1, 0), Position::Board(2)),
        ]);
        let (a, b) = apply_swap(board(), &mut pawns, key(0, 0), key(1, 0)).unwrap();
        assert_eq!(a, Position::Entry(2));
        assert_eq!(b, Position::Board(30));
    }

    #[test]
    fn test_swap_targets_require_pawn_on_track() {
        let pawns = set_with(&[(key(1, 0), Position::Board(10))]);
        assert!(swap_targets(&pawns, key(0, 0)).is_empty());

        let pawns = set_with(&[(key(1, 0), Position::Board(10)), (key(0, 0), Position::Board(40))]);
        assert_eq!(swap_targets(&pawns, key(0, 0)), vec![key(1, 0)]);
    }
}

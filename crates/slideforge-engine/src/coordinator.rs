//! The turn state machine.
//!
//! [`apply`] is the single entry point for player actions. It checks that
//! the actor may act at all, then dispatches to one small handler per
//! [`TurnAction`]. Handlers run against a working copy of the session that
//! is only committed when the handler succeeds, so a rejected action
//! never leaves a trace.

use crate::board::{Board, PLAYER_COUNT};
use crate::card::CardRank;
use crate::moves::{self, MoveBasis, MoveReport};
use crate::pawn::{PawnKey, Position};
use crate::session::{GameSession, SplitData, TurnState};
use crate::TurnError;

/// A player action, already decoded from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAction {
    DrawCard,
    SelectPawn { pawn_id: usize },
    SelectMove { position: Position, steps: Option<u8> },
    ExecuteSorry { target: PawnKey },
    ExecuteSwap { target: PawnKey },
}

impl TurnAction {
    /// Short verb phrase used in errors and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DrawCard => "draw a card",
            Self::SelectPawn { .. } => "select a pawn",
            Self::SelectMove { .. } => "select a move",
            Self::ExecuteSorry { .. } => "play Sorry!",
            Self::ExecuteSwap { .. } => "swap",
        }
    }
}

/// Something the room should tell its players besides the new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Narrative text for every player.
    Message(String),
    /// It is now this seat's turn.
    YourTurn(usize),
    /// The game ended with this seat as the winner.
    GameOver { winner: usize },
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Applies `action` by seat `actor`.
///
/// On success the session has been updated and the returned notices say
/// what happened. On error the session is untouched.
pub fn apply(
    session: &mut GameSession,
    actor: usize,
    action: TurnAction,
) -> Result<Vec<Notice>, TurnError> {
    if session.is_game_over() {
        return Err(TurnError::GameOver);
    }
    if !session.is_started() {
        return Err(TurnError::NotStarted);
    }
    if actor != session.current_player {
        return Err(TurnError::NotYourTurn {
            player: actor,
            current: session.current_player,
        });
    }

    let mut turn = Turn::new(session.clone(), actor);
    match action {
        TurnAction::DrawCard => turn.draw_card(),
        TurnAction::SelectPawn { pawn_id } => turn.select_pawn(pawn_id),
        TurnAction::SelectMove { position, steps } => turn.select_move(position, steps),
        TurnAction::ExecuteSorry { target } => turn.execute_sorry(target),
        TurnAction::ExecuteSwap { target } => turn.execute_swap(target),
    }?;

    let (work, notices) = turn.finish();
    *session = work;
    Ok(notices)
}

/// Starts the game: the first connected seat (normally the host at 0)
/// is asked to draw.
pub fn start_game(session: &mut GameSession) -> Result<Vec<Notice>, TurnError> {
    if session.started {
        return Err(TurnError::WrongState {
            action: "start the game",
            state: session.turn_state,
        });
    }
    let first = (0..PLAYER_COUNT)
        .find(|&i| session.slots[i].is_human())
        .ok_or_else(|| TurnError::Internal("no seated player to start with".into()))?;

    session.started = true;
    session.current_player = first;
    session.turn_state = TurnState::AwaitingDraw;
    session.turn_number = 1;

    Ok(vec![
        Notice::Message(format!(
            "The game has started. {} goes first.",
            session.player_name(first)
        )),
        Notice::YourTurn(first),
    ])
}

/// Reacts to seat `player` having just left.
///
/// If it was that player's turn, the held card is discarded and the turn
/// passes on immediately. There is no waiting for a reconnect.
pub fn handle_departure(session: &mut GameSession, player: usize) -> Vec<Notice> {
    if !session.started || session.is_game_over() || session.current_player != player {
        return Vec::new();
    }

    let mut turn = Turn::new(session.clone(), player);
    turn.say(format!(
        "{} left the game; their turn is skipped.",
        session.player_name(player)
    ));
    turn.discard_held();
    turn.advance();
    let (work, notices) = turn.finish();
    *session = work;
    notices
}

// ---------------------------------------------------------------------------
// Turn: one action against a working copy
// ---------------------------------------------------------------------------

struct Turn {
    work: GameSession,
    actor: usize,
    notices: Vec<Notice>,
}

impl Turn {
    fn new(work: GameSession, actor: usize) -> Self {
        Self {
            work,
            actor,
            notices: Vec::new(),
        }
    }

    fn finish(self) -> (GameSession, Vec<Notice>) {
        (self.work, self.notices)
    }

    fn board(&self) -> &'static Board {
        Board::standard()
    }

    fn name(&self, player: usize) -> String {
        self.work.player_name(player).to_owned()
    }

    fn say(&mut self, text: String) {
        self.notices.push(Notice::Message(text));
    }

    fn wrong_state(&self, action: &'static str) -> TurnError {
        TurnError::WrongState {
            action,
            state: self.work.turn_state,
        }
    }

    fn held_card(&self) -> Result<CardRank, TurnError> {
        self.work
            .current_card
            .ok_or_else(|| TurnError::Internal("no card held in a selection state".into()))
    }

    fn selected(&self) -> Result<PawnKey, TurnError> {
        self.work
            .selected_pawn
            .ok_or_else(|| TurnError::Internal("no pawn selected in a target state".into()))
    }

    // -- drawCard --

    fn draw_card(&mut self) -> Result<(), TurnError> {
        if self.work.turn_state != TurnState::AwaitingDraw || self.work.current_card.is_some() {
            return Err(self.wrong_state("draw a card"));
        }

        let Some(card) = self.work.deck.draw() else {
            self.say(format!(
                "No cards left to draw. {}'s turn is over.",
                self.name(self.actor)
            ));
            self.advance();
            return Ok(());
        };

        self.work.current_card = Some(card);
        self.say(format!("{} drew {card}.", self.name(self.actor)));

        let (state, selectable) = self.offer(card);
        if selectable.is_empty() {
            tracing::debug!(player = self.actor, %card, "no playable pawn; skipping turn");
            self.say(format!(
                "{} cannot play {card}; turn skipped.",
                self.name(self.actor)
            ));
            self.discard_held();
            self.advance();
        } else {
            self.work.selectable_pawn_ids = selectable;
            self.work.turn_state = state;
        }
        Ok(())
    }

    /// Which selection state `card` leads to, and which pawns may be
    /// picked in it.
    fn offer(&self, card: CardRank) -> (TurnState, Vec<usize>) {
        let board = self.board();
        let pawns = &self.work.pawns;
        let player = self.actor;

        match card {
            CardRank::Sorry => {
                let ids = if moves::sorry_targets(pawns, player).is_empty() {
                    Vec::new()
                } else {
                    pawns
                        .of_player(player)
                        .filter(|p| p.position == Position::Start)
                        .map(|p| p.id)
                        .collect()
                };
                (TurnState::SelectSorryPawn, ids)
            }
            CardRank::Eleven => {
                let basis = MoveBasis::Card(card);
                let ids = pawns
                    .of_player(player)
                    .filter(|p| {
                        !moves::legal_moves(board, pawns, p.key(), basis).is_empty()
                            || !moves::swap_targets(pawns, p.key()).is_empty()
                    })
                    .map(|p| p.id)
                    .collect();
                (TurnState::Select11Pawn, ids)
            }
            CardRank::Seven => (
                TurnState::Select7Pawn1,
                moves::movable_pawns(board, pawns, player, MoveBasis::Card(card)),
            ),
            _ => (
                TurnState::SelectPawn,
                moves::movable_pawns(board, pawns, player, MoveBasis::Card(card)),
            ),
        }
    }

    // -- selectPawn --

    fn select_pawn(&mut self, pawn_id: usize) -> Result<(), TurnError> {
        let state = self.work.turn_state;
        if !state.is_pawn_selection() {
            return Err(self.wrong_state("select a pawn"));
        }
        if !self.work.selectable_pawn_ids.contains(&pawn_id) {
            return Err(TurnError::InvalidPawn(pawn_id));
        }

        let card = self.held_card()?;
        let key = PawnKey::new(self.actor, pawn_id);
        let board = self.board();
        // Two or more candidates at the first 7 selection forces a split.
        let must_split = self.work.selectable_pawn_ids.len() >= 2;

        self.work.clear_selection();
        self.work.selected_pawn = Some(key);
        let pawns = &self.work.pawns;

        let next = match state {
            TurnState::SelectPawn => {
                self.work.valid_moves = moves::legal_moves(board, pawns, key, MoveBasis::Card(card));
                TurnState::SelectMove
            }
            TurnState::SelectSorryPawn => {
                self.work.targetable_opponents = moves::sorry_targets(pawns, self.actor);
                TurnState::SelectSorryTarget
            }
            TurnState::Select11Pawn => {
                self.work.valid_moves = moves::legal_moves(board, pawns, key, MoveBasis::Card(card));
                self.work.targetable_opponents = moves::swap_targets(pawns, key);
                TurnState::Select11Action
            }
            TurnState::Select7Pawn1 => {
                let mut options = moves::legal_moves(board, pawns, key, MoveBasis::Card(card));
                if must_split {
                    options.retain(|m| m.steps.is_some_and(|s| s < 7));
                }
                self.work.valid_moves = options;
                TurnState::Select7Move1
            }
            TurnState::Select7Pawn2 => {
                let split = self
                    .work
                    .split
                    .as_mut()
                    .ok_or_else(|| TurnError::Internal("second 7 pawn without split data".into()))?;
                split.second_pawn_id = Some(pawn_id);
                let remaining = split.remaining();
                self.work.valid_moves =
                    moves::legal_moves(board, pawns, key, MoveBasis::Steps(remaining));
                TurnState::Select7Move2
            }
            _ => return Err(self.wrong_state("select a pawn")),
        };

        self.work.turn_state = next;
        Ok(())
    }

    // -- selectMove --

    fn select_move(&mut self, position: Position, steps: Option<u8>) -> Result<(), TurnError> {
        let state = self.work.turn_state;
        if !state.is_move_selection() {
            return Err(self.wrong_state("select a move"));
        }
        let option = self
            .work
            .valid_moves
            .iter()
            .find(|m| m.matches(position, steps))
            .copied()
            .ok_or(TurnError::InvalidMove(position))?;
        let key = self.selected()?;

        let report = moves::apply_move(self.board(), &mut self.work.pawns, key, option.position)?;
        self.narrate_move(key, &report);

        if self.check_win() {
            return Ok(());
        }

        if state == TurnState::Select7Move1 {
            let used = option
                .steps
                .ok_or_else(|| TurnError::Internal("7 move without a step count".into()))?;
            if used < 7 && self.begin_second_split(key, used) {
                return Ok(());
            }
        }

        self.discard_held();
        self.advance();
        Ok(())
    }

    /// After the first half of a split 7, offers the remainder to another
    /// pawn. Returns `false` when no other pawn can use it.
    fn begin_second_split(&mut self, first: PawnKey, used: u8) -> bool {
        let remaining = 7 - used;
        let candidates: Vec<usize> = moves::movable_pawns(
            self.board(),
            &self.work.pawns,
            self.actor,
            MoveBasis::Steps(remaining),
        )
        .into_iter()
        .filter(|&id| id != first.id)
        .collect();

        if candidates.is_empty() {
            self.say(format!("No other pawn can move the remaining {remaining}."));
            return false;
        }

        self.work.clear_selection();
        self.work.split = Some(SplitData {
            first_pawn_id: first.id,
            first_steps: used,
            second_pawn_id: None,
        });
        self.work.selectable_pawn_ids = candidates;
        self.work.turn_state = TurnState::Select7Pawn2;
        true
    }

    fn narrate_move(&mut self, key: PawnKey, report: &MoveReport) {
        let who = self.name(self.actor);
        match report.slide {
            Some(slide) => self.say(format!(
                "{who} moved pawn {} onto a slide at {} and slid to {}.",
                key.id, slide.start, report.landed
            )),
            None => self.say(format!("{who} moved pawn {} to {}.", key.id, report.landed)),
        }
        for victim in &report.bumped {
            let owner = self.name(victim.player);
            self.say(format!("{owner}'s pawn {} was sent back to start.", victim.id));
        }
    }

    // -- executeSorry / executeSwap --

    fn check_target(&self, target: PawnKey) -> Result<PawnKey, TurnError> {
        if target.player == self.actor {
            return Err(TurnError::OwnTarget);
        }
        if !self.work.targetable_opponents.contains(&target) {
            return Err(TurnError::InvalidTarget(target));
        }
        self.selected()
    }

    fn execute_sorry(&mut self, target: PawnKey) -> Result<(), TurnError> {
        if self.work.turn_state != TurnState::SelectSorryTarget {
            return Err(self.wrong_state("play Sorry!"));
        }
        let actor = self.check_target(target)?;

        let landed = moves::apply_sorry(self.board(), &mut self.work.pawns, actor, target)?;
        self.say(format!(
            "Sorry! {} took {}'s place at {landed}; their pawn {} goes back to start.",
            self.name(self.actor),
            self.name(target.player),
            target.id
        ));

        self.discard_held();
        self.advance();
        Ok(())
    }

    fn execute_swap(&mut self, target: PawnKey) -> Result<(), TurnError> {
        if self.work.turn_state != TurnState::Select11Action {
            return Err(self.wrong_state("swap"));
        }
        let actor = self.check_target(target)?;

        let (actor_to, target_to) =
            moves::apply_swap(self.board(), &mut self.work.pawns, actor, target)?;
        self.say(format!(
            "{} swapped pawn {} ({actor_to}) with {}'s pawn {} ({target_to}).",
            self.name(self.actor),
            actor.id,
            self.name(target.player),
            target.id
        ));

        self.discard_held();
        self.advance();
        Ok(())
    }

    // -- Resolution --

    fn discard_held(&mut self) {
        if let Some(card) = self.work.current_card.take() {
            self.work.deck.discard(card);
        }
    }

    /// Declares the actor the winner if all their pawns are home.
    fn check_win(&mut self) -> bool {
        if !self.work.pawns.all_home(self.actor) {
            return false;
        }
        self.discard_held();
        self.work.clear_selection();
        self.work.split = None;
        self.work.winner = Some(self.actor);
        self.work.turn_state = TurnState::GameOver;
        self.say(format!("{} wins!", self.name(self.actor)));
        self.notices.push(Notice::GameOver { winner: self.actor });
        true
    }

    /// Resolves the turn and hands it to the next connected seat.
    ///
    /// Pending and disconnected seats are passed over. With a single
    /// connected player the turn comes straight back to them.
    fn advance(&mut self) {
        self.work.clear_selection();
        self.work.split = None;
        self.work.turn_state = TurnState::TurnResolved;

        let from = self.work.current_player;
        let next = (1..=PLAYER_COUNT)
            .map(|offset| (from + offset) % PLAYER_COUNT)
            .find(|&i| self.work.slots[i].is_human());

        // Nobody left to play: the room is about to be torn down.
        let Some(next) = next else {
            return;
        };

        self.work.current_player = next;
        self.work.turn_number += 1;
        self.work.turn_state = TurnState::AwaitingDraw;
        self.notices.push(Notice::YourTurn(next));
    }
}

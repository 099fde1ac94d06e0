use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, TryRecvError};

use crate::state::{DialState, Gear};

/// A decoded device token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Speed(i32),
    Transmission(Gear),
    Ignored,
}

impl Token {
    /// Classify one raw token.
    ///
    /// Numeric parsing is tried first, then the single-letter gear symbols.
    /// Surrounding whitespace is not stripped.
    pub fn classify(raw: &str) -> Token {
        if let Ok(speed) = raw.parse::<i32>() {
            return Token::Speed(speed);
        }
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Gear::from_symbol(c).map_or(Token::Ignored, Token::Transmission),
            _ => Token::Ignored,
        }
    }

    pub fn apply(self, state: &mut DialState) {
        match self {
            Token::Speed(speed) => state.set_speed(speed),
            Token::Transmission(gear) => state.set_gear(gear),
            Token::Ignored => {}
        }
    }
}

/// Classify `raw` and fold it into `state`
pub fn interpret(raw: &str, state: &mut DialState) -> Token {
    let token = Token::classify(raw);
    log::trace!("token {raw:?} -> {token:?}");
    token.apply(state);
    token
}

/// Result of polling a [`TokenSource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Token(String),
    /// Nothing queued right now
    Empty,
    /// The producer is gone; no more tokens will arrive
    Closed,
}

/// Queue of tokens produced off the render thread.
///
/// Polled only from the thread that owns the [`DialState`], so state
/// mutation is serialized with rendering.
pub trait TokenSource {
    fn poll_token(&mut self) -> Delivery;
}

impl TokenSource for Receiver<String> {
    fn poll_token(&mut self) -> Delivery {
        match self.try_recv() {
            Ok(token) => Delivery::Token(token),
            Err(TryRecvError::Empty) => Delivery::Empty,
            Err(TryRecvError::Disconnected) => Delivery::Closed,
        }
    }
}

impl TokenSource for VecDeque<String> {
    fn poll_token(&mut self) -> Delivery {
        self.pop_front().map_or(Delivery::Empty, Delivery::Token)
    }
}

/// Most tokens applied by one [`drain`]; the rest wait for the next frame
pub const MAX_TOKENS_PER_DRAIN: usize = 256;

/// Apply what is queued in `source` to `state`, up to
/// [`MAX_TOKENS_PER_DRAIN`] tokens.
///
/// Returns `false` once the source reports it is closed.
pub fn drain<S: TokenSource + ?Sized>(source: &mut S, state: &mut DialState) -> bool {
    for _ in 0..MAX_TOKENS_PER_DRAIN {
        match source.poll_token() {
            Delivery::Token(raw) => {
                interpret(&raw, state);
            }
            Delivery::Empty => return true,
            Delivery::Closed => return false,
        }
    }
    log::trace!("drain stopped at {MAX_TOKENS_PER_DRAIN} tokens");
    true
}

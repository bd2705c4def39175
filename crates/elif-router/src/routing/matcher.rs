//! Route template matching
//!
//! Matching walks the segment tree with backtracking: captures and splats try
//! their longest candidate first and give characters back when the rest of
//! the template fails, and optional groups are tried present before absent.
//! Anchored matching must consume the whole path; peeking only needs a
//! prefix and is used by mounts.

use super::params::Params;
use super::pattern::{Constraint, Segment, Template};
use std::borrow::Cow;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    /// The whole path must be consumed
    End,
    /// The match may stop anywhere in the path
    Prefix,
}

// Segments still to be matched after the current slice is exhausted.
struct Continuation<'t, 'c> {
    segments: &'t [Segment],
    next: Option<&'c Continuation<'t, 'c>>,
}

struct State<'t, 'p> {
    path: &'p str,
    anchor: Anchor,
    captures: Vec<(&'t str, Range<usize>)>,
}

impl State<'_, '_> {
    fn finish(&self, pos: usize) -> Option<usize> {
        match self.anchor {
            Anchor::End => (pos == self.path.len()).then_some(pos),
            Anchor::Prefix => Some(pos),
        }
    }
}

/// Match the whole path against the template
pub fn match_path(template: &Template, path: &str) -> Option<Params> {
    let mut state = State {
        path,
        anchor: Anchor::End,
        captures: Vec::new(),
    };
    walk(template.segments(), None, 0, &mut state)?;
    Some(collect(template, &state))
}

/// Match a prefix of the path, returning the matched prefix and its captures
pub fn peek<'p>(template: &Template, path: &'p str) -> Option<(&'p str, Params)> {
    let mut state = State {
        path,
        anchor: Anchor::Prefix,
        captures: Vec::new(),
    };
    let end = walk(template.segments(), None, 0, &mut state)?;
    Some((&path[..end], collect(template, &state)))
}

fn walk<'t>(
    segments: &'t [Segment],
    next: Option<&Continuation<'t, '_>>,
    pos: usize,
    state: &mut State<'t, '_>,
) -> Option<usize> {
    let Some((first, rest)) = segments.split_first() else {
        return match next {
            Some(continuation) => walk(continuation.segments, continuation.next, pos, state),
            None => state.finish(pos),
        };
    };

    match first {
        Segment::Literal(text) => {
            if state.path[pos..].starts_with(text.as_str()) {
                walk(rest, next, pos + text.len(), state)
            } else {
                None
            }
        }
        Segment::Capture { name, constraint } => {
            let limit = state.path[pos..]
                .find('/')
                .map_or(state.path.len(), |offset| pos + offset);
            try_lengths(name, constraint.as_ref(), pos + 1, limit, rest, next, pos, state)
        }
        Segment::Splat { name, constraint } => {
            let limit = state.path.len();
            try_lengths(name, constraint.as_ref(), pos, limit, rest, next, pos, state)
        }
        Segment::Optional(inner) => {
            let mark = state.captures.len();
            let continuation = Continuation {
                segments: rest,
                next,
            };
            if let Some(end) = walk(inner, Some(&continuation), pos, state) {
                return Some(end);
            }
            state.captures.truncate(mark);
            walk(rest, next, pos, state)
        }
    }
}

// Tries capture ends from `limit` down to `shortest`, longest first.
#[allow(clippy::too_many_arguments)]
fn try_lengths<'t>(
    name: &'t str,
    constraint: Option<&Constraint>,
    shortest: usize,
    limit: usize,
    rest: &'t [Segment],
    next: Option<&Continuation<'t, '_>>,
    start: usize,
    state: &mut State<'t, '_>,
) -> Option<usize> {
    let mut end = limit;
    while end >= shortest {
        if state.path.is_char_boundary(end) && accepts(constraint, &state.path[start..end]) {
            state.captures.push((name, start..end));
            if let Some(done) = walk(rest, next, end, state) {
                return Some(done);
            }
            state.captures.pop();
        }
        if end == 0 {
            break;
        }
        end -= 1;
    }
    None
}

fn accepts(constraint: Option<&Constraint>, raw: &str) -> bool {
    match constraint {
        Some(constraint) => constraint.validate(&decode(raw)),
        None => true,
    }
}

fn decode(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

fn collect(template: &Template, state: &State<'_, '_>) -> Params {
    template
        .names()
        .iter()
        .map(|name| {
            let value = state
                .captures
                .iter()
                .find(|(captured, _)| *captured == name.as_str())
                .map(|(_, range)| decode(&state.path[range.clone()]).into_owned());
            (name.as_str(), value)
        })
        .collect()
}

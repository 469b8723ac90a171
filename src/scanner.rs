//! # Scanner Primitives
//!
//! The parser never tokenizes. Every decision it makes about nesting goes
//! through the single left-to-right pass implemented here: [`scan`] visits
//! each character once and tracks a depth counter per [`Wrapper`] kind plus
//! whether the cursor sits inside a string literal.
//!
//! ## Rules
//!
//! - A `"` toggles string mode. Inside a string a backslash escapes the next
//!   character, so `\"` does not close it, and no bracket is counted.
//! - `<` and `>` directly preceded by `~` or `=` are the tips of the lambda
//!   arrows `~>` / `=>` and are never counted as generic brackets.
//!
//! All higher-level helpers ([`split_top_level`], [`match_wrapped`],
//! [`find_bracket_end`], [`find_top_level_assignment`]) are thin visitors
//! over [`scan`].

use std::ops::ControlFlow;

/// The four bracket pairs the scanner keeps depth counters for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wrapper {
    /// `(` `)` - calls, parameter lists and grouping
    Paren,
    /// `{` `}` - list literals and lambda bodies
    Brace,
    /// `[` `]` - simple lambdas, generic names and type arguments
    Bracket,
    /// `<` `>` - generic arguments of a call
    Angle,
}

impl Wrapper {
    pub const ALL: [Wrapper; 4] = [
        Wrapper::Paren,
        Wrapper::Brace,
        Wrapper::Bracket,
        Wrapper::Angle,
    ];

    pub fn open(self) -> char {
        match self {
            Wrapper::Paren => '(',
            Wrapper::Brace => '{',
            Wrapper::Bracket => '[',
            Wrapper::Angle => '<',
        }
    }

    pub fn close(self) -> char {
        match self {
            Wrapper::Paren => ')',
            Wrapper::Brace => '}',
            Wrapper::Bracket => ']',
            Wrapper::Angle => '>',
        }
    }

    fn slot(self) -> usize {
        match self {
            Wrapper::Paren => 0,
            Wrapper::Brace => 1,
            Wrapper::Bracket => 2,
            Wrapper::Angle => 3,
        }
    }
}

/// Nesting state of the scanner between two characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanState {
    depths: [i32; 4],
    in_string: bool,
    escaped: bool,
}

impl ScanState {
    pub fn depth(&self, wrapper: Wrapper) -> i32 {
        self.depths[wrapper.slot()]
    }

    pub fn in_string(&self) -> bool {
        self.in_string
    }

    /// Outside of any string and every tracked depth is zero.
    pub fn is_top_level(&self) -> bool {
        self.is_top_level_for(&Wrapper::ALL)
    }

    /// Like [`ScanState::is_top_level`], but only the given wrappers count.
    pub fn is_top_level_for(&self, wrappers: &[Wrapper]) -> bool {
        !self.in_string && wrappers.iter().all(|w| self.depth(*w) == 0)
    }

    fn advance(&mut self, ch: char, previous: Option<char>) {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if ch == '\\' {
                self.escaped = true;
            } else if ch == '"' {
                self.in_string = false;
            }
            return;
        }

        if ch == '"' {
            self.in_string = true;
            return;
        }

        // tip of `=>` or `~>`
        if matches!(ch, '<' | '>') && matches!(previous, Some('~') | Some('=')) {
            return;
        }

        for wrapper in Wrapper::ALL {
            if ch == wrapper.open() {
                self.depths[wrapper.slot()] += 1;
            } else if ch == wrapper.close() {
                self.depths[wrapper.slot()] -= 1;
            }
        }
    }
}

/// One visited character together with the scanner state around it.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    /// Byte offset of `ch` in the scanned text
    pub index: usize,
    pub ch: char,
    pub before: ScanState,
    pub after: ScanState,
}

impl Step {
    /// `ch` opened a counted `wrapper` from top level.
    pub fn opens_top_level(&self, wrapper: Wrapper) -> bool {
        self.ch == wrapper.open()
            && self.before.is_top_level()
            && self.after.depth(wrapper) == self.before.depth(wrapper) + 1
    }

    /// `ch` closed a counted `wrapper`, returning its depth to zero.
    pub fn closes_to_zero(&self, wrapper: Wrapper) -> bool {
        self.ch == wrapper.close()
            && self.after.depth(wrapper) == 0
            && self.before.depth(wrapper) == 1
    }
}

/// Visit every character of `text` once, left to right.
///
/// The visitor may stop the scan early by returning [`ControlFlow::Break`].
/// Returns the state after the last visited character.
pub fn scan<F>(text: &str, mut visit: F) -> ScanState
where
    F: FnMut(&Step) -> ControlFlow<()>,
{
    let mut state = ScanState::default();
    let mut previous = None;

    for (index, ch) in text.char_indices() {
        let before = state;
        state.advance(ch, previous);
        previous = Some(ch);

        let step = Step {
            index,
            ch,
            before,
            after: state,
        };
        if visit(&step).is_break() {
            break;
        }
    }

    state
}

/// Split `text` at every `delimiter` that sits at depth zero for all of
/// `wrappers` and outside of string literals.
///
/// Always returns at least one (possibly empty) segment.
pub fn split_top_level<'a>(text: &'a str, delimiter: char, wrappers: &[Wrapper]) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut start = 0;

    scan(text, |step| {
        if step.ch == delimiter && step.before.is_top_level_for(wrappers) {
            parts.push(&text[start..step.index]);
            start = step.index + step.ch.len_utf8();
        }
        ControlFlow::Continue(())
    });

    parts.push(&text[start..]);
    parts
}

/// Byte index of the last top-level occurrence of `ch`.
pub fn find_last_top_level(text: &str, ch: char) -> Option<usize> {
    let mut found = None;
    scan(text, |step| {
        if step.ch == ch && step.before.is_top_level() {
            found = Some(step.index);
        }
        ControlFlow::Continue(())
    });
    found
}

/// Byte index of the last `wrapper` opened from top level.
pub fn find_last_opening(text: &str, wrapper: Wrapper) -> Option<usize> {
    let mut found = None;
    scan(text, |step| {
        if step.opens_top_level(wrapper) {
            found = Some(step.index);
        }
        ControlFlow::Continue(())
    });
    found
}

/// Whether `text` is exactly one `wrapper` group, e.g. `(a, b)`.
///
/// Both the full text and the text with the outer pair removed have to be
/// balanced. The second check rejects `(9)(9)`, which starts and ends with
/// the right characters but is two groups.
pub fn match_wrapped(text: &str, wrapper: Wrapper) -> bool {
    if text.len() < 2 || !text.starts_with(wrapper.open()) || !text.ends_with(wrapper.close()) {
        return false;
    }

    let inner = &text[1..text.len() - 1];
    is_balanced(text, wrapper) && is_balanced(inner, wrapper)
}

fn is_balanced(text: &str, wrapper: Wrapper) -> bool {
    let mut went_negative = false;
    let end = scan(text, |step| {
        if step.after.depth(wrapper) < 0 {
            went_negative = true;
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    });
    !went_negative && !end.in_string() && end.depth(wrapper) == 0
}

/// Index of the bracket closing the `wrapper` opened at `start`.
pub fn find_bracket_end(text: &str, start: usize, wrapper: Wrapper) -> Option<usize> {
    let tail = text.get(start..)?;
    if !tail.starts_with(wrapper.open()) {
        return None;
    }

    let mut end = None;
    scan(tail, |step| {
        if step.closes_to_zero(wrapper) {
            end = Some(start + step.index);
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    });
    end
}

/// Index of the first top-level `=` that is a plain assignment.
///
/// Arrows (`=>`, `!=>`) and comparison-looking pairs (`==`, `<=`, `>=`,
/// `!=`) are skipped.
pub fn find_top_level_assignment(text: &str) -> Option<usize> {
    let mut found = None;
    let mut previous: Option<char> = None;

    scan(text, |step| {
        let prev = previous;
        previous = Some(step.ch);

        if step.ch != '=' || !step.before.is_top_level() {
            return ControlFlow::Continue(());
        }

        let next = text[step.index + 1..].chars().next();
        if matches!(next, Some('>') | Some('=')) || matches!(prev, Some('=' | '!' | '<' | '>')) {
            return ControlFlow::Continue(());
        }

        found = Some(step.index);
        ControlFlow::Break(())
    });

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_respects_nesting() {
        let parts = split_top_level("a,f(b,c),{d,e},\"x,y\"", ',', &Wrapper::ALL);
        assert_eq!(parts, vec!["a", "f(b,c)", "{d,e}", "\"x,y\""]);
    }

    #[test]
    fn test_split_single_segment() {
        assert_eq!(split_top_level("abc", ',', &Wrapper::ALL), vec!["abc"]);
        assert_eq!(split_top_level("", ',', &Wrapper::ALL), vec![""]);
    }

    #[test]
    fn test_split_only_tracked_wrappers() {
        let parts = split_top_level("a|(b|c)", '|', &[Wrapper::Bracket]);
        assert_eq!(parts, vec!["a", "(b", "c)"]);
    }

    #[test]
    fn test_arrow_is_not_an_angle_bracket() {
        let end = scan("(x)=>{x}", |_| ControlFlow::Continue(()));
        assert_eq!(end.depth(Wrapper::Angle), 0);

        let end = scan("()~>{x}", |_| ControlFlow::Continue(()));
        assert_eq!(end.depth(Wrapper::Angle), 0);
    }

    #[test]
    fn test_escaped_quote_keeps_string_open() {
        let end = scan(r#""a\"(""#, |_| ControlFlow::Continue(()));
        assert!(!end.in_string());
        assert_eq!(end.depth(Wrapper::Paren), 0);
    }

    #[test]
    fn test_match_wrapped() {
        assert!(match_wrapped("(9)", Wrapper::Paren));
        assert!(match_wrapped("((9))", Wrapper::Paren));
        assert!(match_wrapped("{1,{2}}", Wrapper::Brace));
        assert!(!match_wrapped("(9)(9)", Wrapper::Paren));
        assert!(!match_wrapped("(9", Wrapper::Paren));
        assert!(!match_wrapped("(\")\"", Wrapper::Paren));
    }

    #[test]
    fn test_find_bracket_end() {
        assert_eq!(find_bracket_end("f(a(b))c", 1, Wrapper::Paren), Some(6));
        assert_eq!(find_bracket_end("f(a", 1, Wrapper::Paren), None);
        assert_eq!(find_bracket_end("f(a)", 0, Wrapper::Paren), None);
        assert_eq!(find_bracket_end("x<list<T>>", 1, Wrapper::Angle), Some(9));
    }

    #[test]
    fn test_find_top_level_assignment() {
        assert_eq!(find_top_level_assignment("x = 5"), Some(2));
        assert_eq!(find_top_level_assignment("(x)=>{y = 5}"), None);
        assert_eq!(find_top_level_assignment("f(x = 5)"), None);
        assert_eq!(find_top_level_assignment("\"a=b\""), None);
        assert_eq!(find_top_level_assignment("x:()!=>number = f"), Some(14));
    }

    #[test]
    fn test_find_last_opening() {
        assert_eq!(find_last_opening("f(a)(b)", Wrapper::Paren), Some(4));
        assert_eq!(find_last_opening("(f(a))", Wrapper::Paren), Some(0));
        assert_eq!(find_last_opening("abc", Wrapper::Paren), None);
    }
}

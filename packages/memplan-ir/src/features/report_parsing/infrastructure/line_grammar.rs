//! Line grammars of the buffer-assignment report
//!
//! All inputs are already trimmed. `ws` is any run of whitespace, `num` a run
//! of ASCII digits.
//!
//! ```text
//! allocation_header := "allocation" ws num ":" ws? "size" ws num "," <any>
//! value_decl        := "value:" ws "<" num ws label "@" num ">" ws?
//!                      "(size=" num ",offset=" num "):" ws? array_info
//! used_header       := "<" num ws label "@" num <any>
//! live_range_entry  := name ":" ws? num ws? "-" ws? num
//! sequence_entry    := num ws? ":" ws? name
//! label             := [^@>]+           (trimmed, see `split_opt_name`)
//! array_info        := .+
//! ```
//!
//! A label may end in a parenthesised word, `name (opt)` or `name(opt)`,
//! which becomes the optional name. Whitespace before `@` is optional.

/// Forward-only scanner over one line
#[derive(Debug, Clone, Copy)]
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Self {
        Self { rest: line }
    }

    fn eat(&mut self, literal: &str) -> Option<()> {
        self.rest = self.rest.strip_prefix(literal)?;
        Some(())
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    /// At least one whitespace character
    fn ws(&mut self) -> Option<()> {
        if !self.rest.starts_with(char::is_whitespace) {
            return None;
        }
        self.skip_ws();
        Some(())
    }

    fn number(&mut self) -> Option<u64> {
        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return None;
        }
        digits.parse().ok()
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let len = self
            .rest
            .find(|c: char| !keep(c))
            .unwrap_or(self.rest.len());
        let (head, tail) = self.rest.split_at(len);
        self.rest = tail;
        head
    }

    fn rest(&self) -> &'a str {
        self.rest
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationHeader {
    pub alloc_id: u64,
    pub total_size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueDecl<'a> {
    pub id: u64,
    pub name: &'a str,
    pub opt_name: Option<&'a str>,
    pub at: u64,
    pub size: u64,
    pub offset: u64,
    pub array_info: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsedHeader<'a> {
    pub id: u64,
    pub name: &'a str,
    pub opt_name: Option<&'a str>,
    pub at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveRangeEntry<'a> {
    pub name: &'a str,
    pub start: u64,
    pub end: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceEntry<'a> {
    pub index: u64,
    pub name: &'a str,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split `name (opt)` / `name(opt)` into name and optional name
pub fn split_opt_name(label: &str) -> (&str, Option<&str>) {
    let label = label.trim();
    let Some(body) = label.strip_suffix(')') else {
        return (label, None);
    };
    let Some(open) = body.rfind('(') else {
        return (label, None);
    };
    let opt = &body[open + 1..];
    let name = body[..open].trim_end();
    if opt.is_empty() || name.is_empty() || !opt.chars().all(is_word_char) {
        return (label, None);
    }
    (name, Some(opt))
}

/// `<num ws label @num`, shared by value declarations and used-value headers
fn value_label<'a>(cur: &mut Cursor<'a>) -> Option<(u64, &'a str, Option<&'a str>, u64)> {
    cur.eat("<")?;
    let id = cur.number()?;
    cur.ws()?;
    let label = cur.take_while(|c| c != '@' && c != '>');
    let (name, opt_name) = split_opt_name(label);
    if name.is_empty() {
        return None;
    }
    cur.eat("@")?;
    let at = cur.number()?;
    Some((id, name, opt_name, at))
}

pub fn parse_allocation_header(line: &str) -> Option<AllocationHeader> {
    let mut cur = Cursor::new(line);
    cur.eat("allocation")?;
    cur.ws()?;
    let alloc_id = cur.number()?;
    cur.eat(":")?;
    cur.skip_ws();
    cur.eat("size")?;
    cur.ws()?;
    let total_size = cur.number()?;
    cur.eat(",")?;
    Some(AllocationHeader {
        alloc_id,
        total_size,
    })
}

pub fn parse_value_decl(line: &str) -> Option<ValueDecl<'_>> {
    let mut cur = Cursor::new(line);
    cur.eat("value:")?;
    cur.ws()?;
    let (id, name, opt_name, at) = value_label(&mut cur)?;
    cur.eat(">")?;
    cur.skip_ws();
    cur.eat("(size=")?;
    let size = cur.number()?;
    cur.eat(",offset=")?;
    let offset = cur.number()?;
    cur.eat("):")?;
    cur.skip_ws();
    let array_info = cur.rest();
    if array_info.is_empty() {
        return None;
    }
    Some(ValueDecl {
        id,
        name,
        opt_name,
        at,
        size,
        offset,
        array_info,
    })
}

pub fn parse_used_header(line: &str) -> Option<UsedHeader<'_>> {
    let mut cur = Cursor::new(line);
    let (id, name, opt_name, at) = value_label(&mut cur)?;
    Some(UsedHeader {
        id,
        name,
        opt_name,
        at,
    })
}

pub fn parse_live_range_entry(line: &str) -> Option<LiveRangeEntry<'_>> {
    let (name, range) = line.rsplit_once(':')?;
    let name = name.trim();
    let (start, end) = range.split_once('-')?;
    if name.is_empty() {
        return None;
    }
    Some(LiveRangeEntry {
        name,
        start: parse_number(start)?,
        end: parse_number(end)?,
    })
}

pub fn parse_sequence_entry(line: &str) -> Option<SequenceEntry<'_>> {
    let (index, name) = line.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(SequenceEntry {
        index: parse_number(index)?,
        name,
    })
}

fn parse_number(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// `{foo}` → `foo`, `p0{}` → `p0`
pub fn strip_braces(token: &str) -> &str {
    token.trim_matches(|c| c == '{' || c == '}')
}

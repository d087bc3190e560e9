//! Inline `style` attribute parsing.
//!
//! Declarations are split with `cssparser`, the tokenizer browsers use, so
//! comments, quoted font names and escapes are handled the same way. Values
//! are kept as raw text; interpreting them is the cascade's job.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
};

/// One `property: value` pair from a `style` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercased property name.
    pub name: String,
    /// Trimmed value text with any `!important` removed.
    pub value: String,
    pub important: bool,
}

/// Parses the body of a `style` attribute.
///
/// Malformed declarations are skipped; later declarations of the same
/// property are kept after earlier ones so callers can apply them in order.
///
/// ```rust
/// use plainpaste::style::parse_declarations;
///
/// let decls = parse_declarations("color: red; font-family: 'Times New Roman'; bogus");
/// assert_eq!(decls.len(), 2);
/// assert_eq!(decls[1].name, "font-family");
/// assert_eq!(decls[1].value, "'Times New Roman'");
/// ```
pub fn parse_declarations(style: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(style);
    let mut parser = Parser::new(&mut input);
    let mut decl_parser = InlineStyleParser;

    RuleBodyParser::new(&mut parser, &mut decl_parser)
        .flatten()
        .filter(|decl| !decl.value.is_empty())
        .collect()
}

struct InlineStyleParser;

impl<'i> DeclarationParser<'i> for InlineStyleParser {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        let raw = input.slice_from(start).trim();

        let (value, important) = split_important(raw);
        Ok(Declaration {
            name: name.as_ref().to_ascii_lowercase(),
            value: value.to_string(),
            important,
        })
    }
}

impl<'i> AtRuleParser<'i> for InlineStyleParser {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for InlineStyleParser {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, Declaration, ()> for InlineStyleParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

fn split_important(raw: &str) -> (&str, bool) {
    if let Some(bang) = raw.rfind('!') {
        let flag = raw[bang + 1..].trim();
        if flag.eq_ignore_ascii_case("important") {
            return (raw[..bang].trim_end(), true);
        }
    }
    (raw, false)
}

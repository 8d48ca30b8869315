use crate::{
    error::LexError,
    parser::{
        tables,
        token::{Category, Token, TokenKind},
    },
};

/// Result type used by the tokenizer.
pub type LexResult<T> = Result<T, LexError>;

/// Splits an expression into a tree of tokens grouped by bracket and
/// ternary structure.
///
/// The returned token is the implicit root group; the actual tokens are its
/// children. The pass runs left to right with an expectation state cycling
/// through prefix → operand → postfix → infix position, and a stack of open
/// groups, each waiting for its terminator. The surface ternary forms are
/// re-grouped on the fly: `if c then a else b` and `c ? a : b` both come
/// out as a bootstrap group for the condition or middle part, followed by
/// an `else`/`:` operator token.
///
/// # Errors
/// Returns a [`LexError`] for unbalanced groups, characters that fit no
/// token in the current position, dangling prefix operators, and symbolic
/// names without their brackets.
pub fn tokenize(input: &str) -> LexResult<Token> {
    Tokenizer { input, pos: 0 }.run()
}

struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

/// A group whose closing terminator is still outstanding. The root group
/// has no terminator and is closed by the end of the input.
struct OpenGroup {
    token: Token,
    terminator: Option<&'static str>,
}

fn is_numeric_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Appends a finished token to the group currently open.
fn append(stack: &mut [OpenGroup], token: Token) {
    if let Some(group) = stack.last_mut() {
        group.token.children.push(token);
    }
}

/// Closes the group on top of the stack and hands it to its parent.
fn close(stack: &mut Vec<OpenGroup>) {
    if let Some(group) = stack.pop() {
        append(stack, group.token);
    }
}

impl<'a> Tokenizer<'a> {
    fn run(mut self) -> LexResult<Token> {
        let root = Token::new(Category::Operand, TokenKind::Group, "");
        let mut stack = vec![OpenGroup { token:      root,
                                         terminator: None, }];
        let mut expected = Category::Prefix;

        loop {
            self.skip_whitespace();
            if self.at_end() {
                break;
            }

            if expected == Category::Prefix {
                if let Some(lexeme) = self.fetch(&tables::PREFIX_OPERATORS) {
                    self.pos += lexeme.len();
                    if self.at_end() {
                        return Err(LexError::MissingOperand { pos: self.pos });
                    }
                    append(&mut stack, Token::new(Category::Prefix, TokenKind::Operator, lexeme));
                }
                // a missing prefix is fine
                expected = Category::Operand;
            }

            if expected == Category::Operand {
                if let Some(keyword) = self.fetch(&tables::KEYWORDS) {
                    self.pos += keyword.len();
                    let value = if keyword == "true" { "1" } else { "0" };
                    append(&mut stack, Token::new(Category::Operand, TokenKind::Number, value));
                    expected = Category::Infix;
                    continue;
                } else if self.starts_with(tables::TERNARY_WORDS[0]) {
                    // "if" opens a group that "then" will close
                    self.pos += tables::TERNARY_WORDS[0].len();
                    stack.push(OpenGroup { token:      Token::new(Category::Prefix,
                                                                  TokenKind::Group,
                                                                  tables::TERNARY_WORDS[0]),
                                           terminator: Some(tables::TERNARY_WORDS[1]), });
                    expected = Category::Prefix;
                    continue;
                } else if self.starts_with(tables::TERNARY_WORDS[1])
                          || self.starts_with(tables::TERNARY_WORDS[2])
                {
                    // leave "then"/"else" for the terminator handling below
                    expected = Category::Infix;
                } else if self.peek().is_some_and(is_numeric_char) {
                    let number = self.consume_while(is_numeric_char);
                    append(&mut stack, Token::new(Category::Operand, TokenKind::Number, number));
                    expected = Category::Postfix;
                } else if self.peek().is_some_and(is_identifier_char) {
                    let name = self.consume_while(is_identifier_char);
                    if self.rest().starts_with('(') {
                        self.pos += 1;
                        stack.push(OpenGroup { token:      Token::new(Category::Operand,
                                                                      TokenKind::FunctionCall,
                                                                      name),
                                               terminator: Some(")"), });
                        expected = Category::Prefix;
                        continue;
                    } else if self.rest().starts_with("[]") {
                        self.pos += 2;
                        append(&mut stack,
                               Token::new(Category::Operand, TokenKind::Collection, name));
                        expected = Category::Operand;
                    } else if self.rest().starts_with('[') {
                        self.pos += 1;
                        stack.push(OpenGroup { token:      Token::new(Category::Operand,
                                                                      TokenKind::IndexedVariable,
                                                                      name),
                                               terminator: Some("]"), });
                        expected = Category::Prefix;
                        continue;
                    } else if self.rest().starts_with('{') {
                        self.pos += 1;
                        stack.push(OpenGroup { token:      Token::new(Category::Operand,
                                                                      TokenKind::Aggregation,
                                                                      name),
                                               terminator: Some("}"), });
                        expected = Category::Prefix;
                        continue;
                    } else {
                        append(&mut stack,
                               Token::new(Category::Operand, TokenKind::Variable, name));
                        expected = Category::Postfix;
                    }
                } else if let Some(glyph) = self.fetch(&tables::SYMBOLIC_NAMES) {
                    self.pos += glyph.len();
                    let Some(alias) = tables::symbolic_alias(glyph) else {
                        return Err(LexError::MissingBrackets { pos: self.pos });
                    };
                    if self.rest().starts_with('(') {
                        self.pos += 1;
                        stack.push(OpenGroup { token:      Token::new(Category::Operand,
                                                                      TokenKind::FunctionCall,
                                                                      alias),
                                               terminator: Some(")"), });
                        expected = Category::Prefix;
                        continue;
                    }
                    if self.rest().starts_with('{') {
                        self.pos += 1;
                        stack.push(OpenGroup { token:      Token::new(Category::Operand,
                                                                      TokenKind::Aggregation,
                                                                      alias),
                                               terminator: Some("}"), });
                        expected = Category::Prefix;
                        continue;
                    }
                    return Err(LexError::MissingBrackets { pos: self.pos });
                } else if self.rest().starts_with('(') {
                    self.pos += 1;
                    stack.push(OpenGroup { token:      Token::new(Category::Operand,
                                                                  TokenKind::Group,
                                                                  ""),
                                           terminator: Some(")"), });
                    expected = Category::Prefix;
                    continue;
                } else if self.rest().starts_with('{') {
                    self.pos += 1;
                    stack.push(OpenGroup { token:      Token::new(Category::Operand,
                                                                  TokenKind::Set,
                                                                  ""),
                                           terminator: Some("}"), });
                    expected = Category::Prefix;
                    continue;
                } else if self.rest().starts_with('[') {
                    self.pos += 1;
                    stack.push(OpenGroup { token:      Token::new(Category::Operand,
                                                                  TokenKind::Sequence,
                                                                  ""),
                                           terminator: Some("]"), });
                    expected = Category::Prefix;
                    continue;
                } else {
                    return Err(LexError::UnexpectedOperand { pos: self.pos });
                }
            }

            if expected == Category::Postfix {
                if let Some(lexeme) = self.fetch(&tables::POSTFIX_OPERATORS) {
                    self.pos += lexeme.len();
                    append(&mut stack, Token::new(Category::Postfix, TokenKind::Operator, lexeme));
                }
                expected = Category::Infix;
            }

            self.skip_whitespace();
            if self.at_end() {
                break;
            }

            if let Some(terminator) = stack.last().and_then(|group| group.terminator)
               && self.starts_with(terminator)
            {
                self.pos += terminator.len();
                if terminator == tables::TERNARY_WORDS[1] {
                    // "then" closes the condition and opens the middle part
                    close(&mut stack);
                    stack.push(OpenGroup { token:      Token::new(Category::Infix,
                                                                  TokenKind::Group,
                                                                  tables::TERNARY_WORDS[1]),
                                           terminator: Some(tables::TERNARY_WORDS[2]), });
                    expected = Category::Prefix;
                } else if terminator == ":" || terminator == tables::TERNARY_WORDS[2] {
                    // ":" and "else" close the middle part and become the
                    // operator that triggers the ternary reduction
                    close(&mut stack);
                    append(&mut stack,
                           Token::new(Category::Infix, TokenKind::Operator, terminator));
                    expected = Category::Prefix;
                } else {
                    close(&mut stack);
                    expected = Category::Postfix;
                }
                continue;
            }

            if expected == Category::Infix {
                if self.rest().starts_with(',') {
                    self.pos += 1;
                    append(&mut stack, Token::new(Category::Infix, TokenKind::Separator, ","));
                    expected = Category::Prefix;
                    continue;
                }
                if self.rest().starts_with('?') {
                    self.pos += 1;
                    stack.push(OpenGroup { token:      Token::new(Category::Infix,
                                                                  TokenKind::Group,
                                                                  "?"),
                                           terminator: Some(":"), });
                    expected = Category::Prefix;
                    continue;
                }
                if let Some(lexeme) = self.fetch(&tables::INFIX_OPERATORS) {
                    self.pos += lexeme.len();
                    append(&mut stack, Token::new(Category::Infix, TokenKind::Operator, lexeme));
                    expected = Category::Prefix;
                    continue;
                }
            }

            return Err(LexError::UnexpectedCharacter { pos: self.pos });
        }

        if stack.len() != 1 {
            return Err(LexError::UnbalancedGroups { pos: self.pos });
        }
        stack.pop()
             .map(|group| group.token)
             .ok_or(LexError::UnbalancedGroups { pos: self.pos })
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek()
              && c.is_whitespace()
        {
            self.pos += c.len_utf8();
        }
    }

    /// Tests whether the remaining input begins with `candidate`. A
    /// candidate ending in an identifier character additionally requires a
    /// word boundary, so `orange` never matches the operator `or`.
    fn starts_with(&self, candidate: &str) -> bool {
        let rest = self.rest();
        if !rest.starts_with(candidate) {
            return false;
        }
        match candidate.chars().last() {
            Some(last) if is_identifier_char(last) => rest[candidate.len()..].chars()
                                                                             .next()
                                                                             .is_none_or(|c| {
                                                                                 !is_identifier_char(c)
                                                                             }),
            _ => true,
        }
    }

    /// Returns the first candidate the remaining input begins with.
    fn fetch(&self, candidates: &[&'static str]) -> Option<&'static str> {
        candidates.iter()
                  .copied()
                  .find(|candidate| self.starts_with(candidate))
    }

    fn consume_while(&mut self, predicate: fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek()
              && predicate(c)
        {
            self.pos += c.len_utf8();
        }
        &self.input[start..self.pos]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn children(input: &str) -> Vec<Token> {
        tokenize(input).unwrap_or_else(|e| panic!("tokenizing '{input}' failed: {e}"))
                       .children
    }

    #[test]
    fn categories_and_kinds() {
        let tokens = children("3*5");
        assert_eq!(tokens.len(), 3);
        assert_eq!((tokens[0].category, tokens[0].kind), (Category::Operand, TokenKind::Number));
        assert_eq!((tokens[1].category, tokens[1].kind), (Category::Infix, TokenKind::Operator));
        assert_eq!((tokens[2].category, tokens[2].kind), (Category::Operand, TokenKind::Number));
    }

    #[test]
    fn keywords_become_canonical_numbers() {
        let tokens = children("true && false");
        assert_eq!(tokens[0].value, "1");
        assert_eq!(tokens[2].value, "0");
    }

    #[test]
    fn word_boundary_keeps_identifiers_whole() {
        for input in ["orange", "india", "andrew", "ifx", "true2"] {
            let tokens = children(input);
            assert_eq!(tokens.len(), 1, "'{input}' should be a single token");
            assert_eq!(tokens[0].kind, TokenKind::Variable);
            assert_eq!(tokens[0].value, input);
        }
    }

    #[test]
    fn prefix_and_postfix_are_stamped() {
        let tokens = children("-2³");
        assert_eq!(tokens[0].category, Category::Prefix);
        assert_eq!(tokens[1].kind, TokenKind::Number);
        assert_eq!(tokens[2].category, Category::Postfix);
        assert_eq!(tokens[2].value, "³");
    }

    #[test]
    fn brackets_nest_under_their_opening_token() {
        let tokens = children("sum{1,2}");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Aggregation);
        assert_eq!(tokens[0].value, "sum");
        assert_eq!(tokens[0].children.len(), 3); // 1 , 2
    }

    #[test]
    fn symbolic_names_alias_their_callables() {
        let tokens = children("∑{1}");
        assert_eq!(tokens[0].value, "sum");
        assert_eq!(children("√(9)")[0].value, "sqrt");
        assert!(matches!(tokenize("√9"), Err(LexError::MissingBrackets { .. })));
    }

    #[test]
    fn ternary_surface_forms_are_regrouped() {
        // both forms: condition/middle bootstrap group, then the closing operator
        let tokens = children("true ? 1 : 0");
        assert_eq!(tokens[1].kind, TokenKind::Group);
        assert_eq!(tokens[1].category, Category::Infix);
        assert_eq!(tokens[2].value, ":");

        let tokens = children("if true then 1 else 0");
        assert_eq!(tokens[0].kind, TokenKind::Group);
        assert_eq!(tokens[0].category, Category::Prefix);
        assert_eq!(tokens[1].category, Category::Infix);
        assert_eq!(tokens[2].value, "else");
    }

    #[test]
    fn collection_lexeme_is_only_legal_before_a_terminator() {
        assert!(tokenize("sum{xs[]}").is_ok());
        assert!(tokenize("count(xs[])").is_ok());
        // a collection cannot take part in arithmetic
        assert!(matches!(tokenize("xs[] + 1"), Err(LexError::UnexpectedCharacter { .. })));
    }

    #[test]
    fn longest_infix_match_wins() {
        let tokens = children("x <= y");
        assert_eq!(tokens[1].value, "<=");
        let tokens = children("x not in {1}");
        assert_eq!(tokens[1].value, "not in");
    }

    #[test]
    fn unbalanced_groups_are_reported() {
        assert!(matches!(tokenize("(1 + 2"), Err(LexError::UnbalancedGroups { .. })));
        assert!(matches!(tokenize("{1, 2"), Err(LexError::UnbalancedGroups { .. })));
        assert!(matches!(tokenize("if 1 then 2"), Err(LexError::UnbalancedGroups { .. })));
    }

    #[test]
    fn operand_position_rejects_stray_input() {
        assert!(matches!(tokenize("- 5"), Err(LexError::UnexpectedOperand { .. })));
        assert!(matches!(tokenize("3 * )"), Err(LexError::UnexpectedOperand { .. })));
        assert!(matches!(tokenize("-"), Err(LexError::MissingOperand { .. })));
        assert!(matches!(tokenize("2x"), Err(LexError::UnexpectedCharacter { .. })));
    }
}

//! Expression parser
//!
//! Recursive-descent engine for `$filter`, `$orderby` and `$apply` text,
//! layered by operator precedence (or, and, not/comparison, additive,
//! multiplicative, negation, postfix navigation, primary). Recursion depth
//! is bounded by an explicit counter so pathological nesting fails with a
//! typed error instead of exhausting the host stack.

use crate::lexer::{ExpressionToken, ExpressionTokenKind, TokenStream, tokenize};
use crate::literal::{LiteralParseFailure, LiteralParser};
use odata_uri_ast::{
    AggregateStatementToken, AggregateToken, AggregationVerb, AllToken, AnyToken,
    ApplyTransformation, BinaryOperatorKind, BinaryOperatorToken, DottedIdentifierToken,
    EndPathToken, FunctionCallToken, FunctionParameterToken, GroupByToken, InnerPathToken,
    LiteralToken, NamedValue, OrderByDirection, OrderByToken, PrimitiveType, PrimitiveValue,
    PropertyPathToken, QueryToken, RangeVariableToken, StarToken, UnaryOperatorKind,
    UnaryOperatorToken,
};
use odata_uri_diagnostics::{
    ODU0003, ODU0004, ODU0005, ODU0006, ODU0007, ODU0010, ODU0100, ODU0101, ODU0102, ODU0200,
    Result, UriParseError,
};

/// The implicit iteration variable, always in scope and never declarable
const IMPLICIT_RANGE_VARIABLE: &str = "$it";

/// Parser for URI query expressions, bounded by a recursion-depth limit
#[derive(Debug, Clone, Copy)]
pub struct UriQueryExpressionParser {
    max_depth: u32,
}

impl UriQueryExpressionParser {
    pub const fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }

    /// Parse an arbitrary expression, consuming the whole input
    pub fn parse(&self, text: &str) -> Result<QueryToken> {
        let mut run = ParserRun::new(text, self.max_depth)?;
        let expr = run.parse_expression()?;
        run.expect_end()?;
        Ok(expr)
    }

    /// Parse a `$filter` expression
    pub fn parse_filter(&self, text: &str) -> Result<QueryToken> {
        self.parse(text)
    }

    /// Parse a `$orderby` clause: comma-separated expressions, each with an
    /// optional `asc`/`desc` direction
    pub fn parse_order_by(&self, text: &str) -> Result<Vec<OrderByToken>> {
        let mut run = ParserRun::new(text, self.max_depth)?;
        let mut orderings = Vec::new();
        loop {
            let expr = run.parse_expression()?;
            let direction = if run.current_is_keyword("asc") {
                run.stream.advance();
                OrderByDirection::Ascending
            } else if run.current_is_keyword("desc") {
                run.stream.advance();
                OrderByDirection::Descending
            } else {
                OrderByDirection::Ascending
            };
            orderings.push(OrderByToken::new(expr, direction));
            if run.stream.current().kind == ExpressionTokenKind::Comma {
                run.stream.advance();
            } else {
                break;
            }
        }
        run.expect_end()?;
        Ok(orderings)
    }

    /// Parse a `$apply` chain of `/`-separated transformations
    pub fn parse_apply(&self, text: &str) -> Result<Vec<ApplyTransformation>> {
        let mut run = ParserRun::new(text, self.max_depth)?;
        let mut transformations = Vec::new();
        loop {
            let token = run.stream.current();
            if token.kind != ExpressionTokenKind::Identifier {
                return Err(run.identifier_expected(token));
            }
            match token.text {
                "aggregate" => {
                    run.stream.advance();
                    transformations.push(ApplyTransformation::Aggregate(run.parse_aggregate()?));
                }
                "groupby" => {
                    run.stream.advance();
                    transformations.push(ApplyTransformation::GroupBy(run.parse_group_by()?));
                }
                "filter" => {
                    run.stream.advance();
                    run.expect(ExpressionTokenKind::OpenParen, ODU0004, "'(' expected")?;
                    let expr = run.parse_expression()?;
                    run.expect(ExpressionTokenKind::CloseParen, ODU0005, "')' or ',' expected")?;
                    transformations.push(ApplyTransformation::Filter(Box::new(expr)));
                }
                other => {
                    return Err(run.grammar(
                        ODU0003,
                        format!("'{other}' is not a recognized transformation"),
                        token.position,
                    ));
                }
            }
            if run.stream.current().kind == ExpressionTokenKind::Slash {
                run.stream.advance();
            } else {
                break;
            }
        }
        run.expect_end()?;
        Ok(transformations)
    }
}

/// State owned by one top-level parse call: token cursor, depth counter,
/// and the lexical scope of range-variable names
struct ParserRun<'a> {
    text: &'a str,
    stream: TokenStream<'a>,
    max_depth: u32,
    depth: u32,
    scope: Vec<String>,
    literal_parser: LiteralParser,
}

impl<'a> ParserRun<'a> {
    fn new(text: &'a str, max_depth: u32) -> Result<Self> {
        let tokens = tokenize(text)?;
        Ok(Self {
            text,
            stream: TokenStream::new(tokens),
            max_depth,
            depth: 0,
            scope: vec![IMPLICIT_RANGE_VARIABLE.to_string()],
            literal_parser: LiteralParser::for_parenthesized_keys(),
        })
    }

    fn enter_recurse(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(UriParseError::limit(
                ODU0200,
                "The recursion limit of the query expression has been exceeded",
            ));
        }
        Ok(())
    }

    fn leave_recurse(&mut self) {
        self.depth -= 1;
    }

    fn grammar(
        &self,
        code: odata_uri_diagnostics::ErrorCode,
        what: impl std::fmt::Display,
        position: usize,
    ) -> UriParseError {
        UriParseError::grammar_at(
            code,
            format!("{what} at position {position} in '{}'", self.text),
            position,
        )
    }

    fn identifier_expected(&self, token: ExpressionToken<'a>) -> UriParseError {
        self.grammar(ODU0007, "Identifier expected", token.position)
    }

    fn expect(
        &mut self,
        kind: ExpressionTokenKind,
        code: odata_uri_diagnostics::ErrorCode,
        what: &str,
    ) -> Result<()> {
        let token = self.stream.current();
        if token.kind != kind {
            return Err(self.grammar(code, what, token.position));
        }
        self.stream.advance();
        Ok(())
    }

    fn expect_end(&self) -> Result<()> {
        let token = self.stream.current();
        if token.kind != ExpressionTokenKind::End {
            return Err(self.grammar(ODU0010, "Syntax error", token.position));
        }
        Ok(())
    }

    fn current_is_keyword(&self, keyword: &str) -> bool {
        let token = self.stream.current();
        token.kind == ExpressionTokenKind::Identifier && token.text == keyword
    }

    fn current_binary_op(&self) -> Option<BinaryOperatorKind> {
        let token = self.stream.current();
        if token.kind == ExpressionTokenKind::Identifier {
            BinaryOperatorKind::from_keyword(token.text)
        } else {
            None
        }
    }

    // === Precedence-layered grammar ===

    fn parse_expression(&mut self) -> Result<QueryToken> {
        self.enter_recurse()?;
        let result = self.parse_logical_or()?;
        self.leave_recurse();
        Ok(result)
    }

    fn parse_logical_or(&mut self) -> Result<QueryToken> {
        let mut left = self.parse_logical_and()?;
        while self.current_is_keyword("or") {
            self.stream.advance();
            let right = self.parse_logical_and()?;
            left = QueryToken::BinaryOperator(BinaryOperatorToken::new(
                BinaryOperatorKind::Or,
                left,
                right,
            ));
        }
        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<QueryToken> {
        let mut left = self.parse_comparison()?;
        while self.current_is_keyword("and") {
            self.stream.advance();
            let right = self.parse_comparison()?;
            left = QueryToken::BinaryOperator(BinaryOperatorToken::new(
                BinaryOperatorKind::And,
                left,
                right,
            ));
        }
        Ok(left)
    }

    /// `not` applies at the comparison tier: its operand may itself be a
    /// comparison, but never an `and`/`or` chain
    fn parse_comparison(&mut self) -> Result<QueryToken> {
        if self.current_is_keyword("not") {
            self.stream.advance();
            self.enter_recurse()?;
            let operand = self.parse_comparison()?;
            self.leave_recurse();
            return Ok(QueryToken::UnaryOperator(UnaryOperatorToken::new(
                UnaryOperatorKind::Not,
                operand,
            )));
        }
        let mut left = self.parse_additive()?;
        while let Some(op) = self.current_binary_op().filter(BinaryOperatorKind::is_comparison) {
            self.stream.advance();
            let right = self.parse_additive()?;
            left = QueryToken::BinaryOperator(BinaryOperatorToken::new(op, left, right));
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<QueryToken> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.current_binary_op().filter(|op| {
            matches!(op, BinaryOperatorKind::Add | BinaryOperatorKind::Subtract)
        }) {
            self.stream.advance();
            let right = self.parse_multiplicative()?;
            left = QueryToken::BinaryOperator(BinaryOperatorToken::new(op, left, right));
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<QueryToken> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.current_binary_op().filter(|op| {
            matches!(
                op,
                BinaryOperatorKind::Multiply
                    | BinaryOperatorKind::Divide
                    | BinaryOperatorKind::Modulo
            )
        }) {
            self.stream.advance();
            let right = self.parse_unary()?;
            left = QueryToken::BinaryOperator(BinaryOperatorToken::new(op, left, right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<QueryToken> {
        if self.stream.current().kind == ExpressionTokenKind::Minus {
            self.stream.advance();
            self.enter_recurse()?;
            let operand = self.parse_unary()?;
            self.leave_recurse();
            return Ok(QueryToken::UnaryOperator(UnaryOperatorToken::new(
                UnaryOperatorKind::Negate,
                operand,
            )));
        }
        self.parse_postfix()
    }

    /// Postfix `/` navigation over a primary expression
    fn parse_postfix(&mut self) -> Result<QueryToken> {
        let mut expr = self.parse_primary_start()?;
        while self.stream.current().kind == ExpressionTokenKind::Slash {
            self.stream.advance();
            // The step we just finished is no longer trailing
            expr = promote_to_inner(expr);
            let token = self.stream.current();
            match token.kind {
                ExpressionTokenKind::Identifier => {
                    expr = self.parse_identifier(Some(expr))?;
                }
                ExpressionTokenKind::Star => {
                    expr = self.parse_star_member_access(Some(expr))?;
                }
                _ => return Err(self.identifier_expected(token)),
            }
        }
        Ok(expr)
    }

    fn parse_primary_start(&mut self) -> Result<QueryToken> {
        let token = self.stream.current();
        match token.kind {
            kind if kind.is_literal() => self.parse_literal_token(),
            ExpressionTokenKind::Identifier => self.parse_identifier(None),
            ExpressionTokenKind::OpenParen => {
                self.stream.advance();
                let expr = self.parse_expression()?;
                self.expect(ExpressionTokenKind::CloseParen, ODU0005, "')' or ',' expected")?;
                Ok(expr)
            }
            _ => Err(self.grammar(ODU0006, "Expression expected", token.position)),
        }
    }

    // === Literals ===

    fn parse_literal_token(&mut self) -> Result<QueryToken> {
        let token = self.stream.current();
        let parsed = match token.kind {
            // Integers bind to the narrowest machine type that fits
            ExpressionTokenKind::IntegerLiteral => self
                .literal_parser
                .try_parse(PrimitiveType::Int32, token.text)
                .or_else(|_| self.literal_parser.try_parse(PrimitiveType::Int64, token.text)),
            ExpressionTokenKind::DecimalLiteral => {
                self.literal_parser.try_parse(PrimitiveType::Decimal, token.text)
            }
            ExpressionTokenKind::DoubleLiteral => {
                self.literal_parser.try_parse(PrimitiveType::Double, token.text)
            }
            ExpressionTokenKind::SingleLiteral => {
                self.literal_parser.try_parse(PrimitiveType::Single, token.text)
            }
            ExpressionTokenKind::StringLiteral => {
                self.literal_parser.try_parse(PrimitiveType::String, token.text)
            }
            ExpressionTokenKind::BooleanLiteral => {
                self.literal_parser.try_parse(PrimitiveType::Boolean, token.text)
            }
            ExpressionTokenKind::NullLiteral => {
                self.literal_parser.try_parse(PrimitiveType::Null, token.text)
            }
            ExpressionTokenKind::GuidLiteral => {
                self.literal_parser.try_parse(PrimitiveType::Guid, token.text)
            }
            ExpressionTokenKind::DateLiteral => {
                self.literal_parser.try_parse(PrimitiveType::Date, token.text)
            }
            ExpressionTokenKind::TimeOfDayLiteral => {
                self.literal_parser.try_parse(PrimitiveType::TimeOfDay, token.text)
            }
            ExpressionTokenKind::DateTimeOffsetLiteral => self
                .literal_parser
                .try_parse(PrimitiveType::DateTimeOffset, token.text),
            ExpressionTokenKind::DurationLiteral => {
                self.literal_parser.try_parse(PrimitiveType::Duration, token.text)
            }
            ExpressionTokenKind::BinaryLiteral => {
                self.literal_parser.try_parse(PrimitiveType::Binary, token.text)
            }
            ExpressionTokenKind::GeographyLiteral => self
                .literal_parser
                .try_parse(PrimitiveType::GeographyPoint, token.text),
            ExpressionTokenKind::GeometryLiteral => self
                .literal_parser
                .try_parse(PrimitiveType::GeometryPoint, token.text),
            _ => Err(LiteralParseFailure::Malformed),
        };

        match parsed {
            Ok(value) => {
                self.stream.advance();
                Ok(QueryToken::Literal(LiteralToken::new(value, token.text)))
            }
            Err(LiteralParseFailure::InvalidSpatialData) => Err(self.grammar(
                ODU0102,
                format!("Invalid spatial data in '{}'", token.text),
                token.position,
            )),
            Err(LiteralParseFailure::Malformed) => Err(self.grammar(
                ODU0003,
                format!("Unrecognized literal '{}'", token.text),
                token.position,
            )),
        }
    }

    // === Identifiers, functions and lambdas ===

    /// Disambiguate a bare identifier: function call, lambda, type cast,
    /// wildcard, range variable, or property access
    fn parse_identifier(&mut self, parent: Option<QueryToken>) -> Result<QueryToken> {
        let (name, dotted) = self.read_dotted_identifier()?;

        if self.stream.current().kind == ExpressionTokenKind::OpenParen {
            // `any`/`all` are lambdas only when a navigation source
            // precedes; a bare `any(...)` is an ordinary function call
            if let Some(source) = parent {
                if name == "any" || name == "all" {
                    return self.parse_any_all(source, name == "any");
                }
                return self.parse_identifier_as_function(name, Some(source));
            }
            return self.parse_identifier_as_function(name, None);
        }

        if dotted {
            return Ok(QueryToken::DottedIdentifier(DottedIdentifierToken::new(
                name, parent,
            )));
        }

        Ok(self.parse_member_access(name, parent))
    }

    /// Assemble `identifier(.identifier)*`, returning the joined name
    fn read_dotted_identifier(&mut self) -> Result<(String, bool)> {
        let token = self.stream.current();
        debug_assert_eq!(token.kind, ExpressionTokenKind::Identifier);
        let mut name = token.text.to_string();
        self.stream.advance();

        let mut dotted = false;
        while self.stream.current().kind == ExpressionTokenKind::Dot
            && self.stream.peek(1).kind == ExpressionTokenKind::Identifier
        {
            dotted = true;
            name.push('.');
            name.push_str(self.stream.peek(1).text);
            self.stream.advance();
            self.stream.advance();
        }
        Ok((name, dotted))
    }

    /// Map a bare name to a range variable reference or a path step
    fn parse_member_access(&mut self, identifier: String, parent: Option<QueryToken>) -> QueryToken {
        if parent.is_none() && self.scope.iter().any(|name| *name == identifier) {
            return QueryToken::RangeVariable(RangeVariableToken::new(identifier));
        }
        QueryToken::EndPath(EndPathToken::new(identifier, parent))
    }

    /// Consume a `*` token; anything else is a construction error
    fn parse_star_member_access(&mut self, parent: Option<QueryToken>) -> Result<QueryToken> {
        let token = self.stream.current();
        if token.kind != ExpressionTokenKind::Star {
            return Err(UriParseError::declaration(
                ODU0101,
                format!("Cannot create a star token from '{}'", token.text),
            ));
        }
        self.stream.advance();
        Ok(QueryToken::Star(StarToken::new(parent)))
    }

    fn declare_range_variable(&mut self, name: &str) -> Result<()> {
        if self.scope.iter().any(|declared| declared == name) {
            return Err(UriParseError::declaration(
                ODU0100,
                format!("The range variable '{name}' has already been declared"),
            ));
        }
        self.scope.push(name.to_string());
        Ok(())
    }

    fn undeclare_range_variable(&mut self, name: &str) {
        debug_assert_eq!(self.scope.last().map(String::as_str), Some(name));
        self.scope.pop();
    }

    /// Parse `any(...)`/`all(...)` after a navigation source
    fn parse_any_all(&mut self, source: QueryToken, is_any: bool) -> Result<QueryToken> {
        self.expect(ExpressionTokenKind::OpenParen, ODU0004, "'(' expected")?;

        // Bodiless form: `any()` means "any element at all"
        if self.stream.current().kind == ExpressionTokenKind::CloseParen {
            self.stream.advance();
            let body = QueryToken::Literal(LiteralToken::new(PrimitiveValue::Boolean(true), "true"));
            return Ok(if is_any {
                QueryToken::Any(AnyToken::new(source, None, body))
            } else {
                QueryToken::All(AllToken::new(source, None, body))
            });
        }

        let param_token = self.stream.current();
        if param_token.kind != ExpressionTokenKind::Identifier {
            return Err(self.identifier_expected(param_token));
        }
        let parameter = param_token.text.to_string();
        self.declare_range_variable(&parameter)?;
        self.stream.advance();

        // The separator between variable and body must be a colon
        let separator = self.stream.current();
        if separator.kind != ExpressionTokenKind::Colon {
            return Err(self.grammar(ODU0003, "Syntax error", separator.position));
        }
        self.stream.advance();

        let body = self.parse_expression()?;
        self.expect(ExpressionTokenKind::CloseParen, ODU0005, "')' or ',' expected")?;
        self.undeclare_range_variable(&parameter);

        Ok(if is_any {
            QueryToken::Any(AnyToken::new(source, Some(parameter), body))
        } else {
            QueryToken::All(AllToken::new(source, Some(parameter), body))
        })
    }

    /// Parse `name(args)` into a function call token
    fn parse_identifier_as_function(
        &mut self,
        name: String,
        source: Option<QueryToken>,
    ) -> Result<QueryToken> {
        let arguments = self.parse_argument_list()?;
        Ok(QueryToken::FunctionCall(FunctionCallToken::new(
            name, arguments, source,
        )))
    }

    /// Parse a parenthesized argument list; empty lists are valid
    fn parse_argument_list(&mut self) -> Result<Vec<FunctionParameterToken>> {
        self.expect(ExpressionTokenKind::OpenParen, ODU0004, "'(' expected")?;

        if self.stream.current().kind == ExpressionTokenKind::CloseParen {
            self.stream.advance();
            return Ok(Vec::new());
        }
        if self.stream.current().kind == ExpressionTokenKind::End {
            let position = self.stream.current().position;
            return Err(self.grammar(ODU0006, "Expression expected", position));
        }

        let mut arguments = vec![self.parse_argument()?];
        while self.stream.current().kind == ExpressionTokenKind::Comma {
            self.stream.advance();
            arguments.push(self.parse_argument()?);
        }
        self.expect(ExpressionTokenKind::CloseParen, ODU0005, "')' or ',' expected")?;
        Ok(arguments)
    }

    /// One argument: `name=expression` or a bare positional expression
    fn parse_argument(&mut self) -> Result<FunctionParameterToken> {
        if self.stream.current().kind == ExpressionTokenKind::Identifier
            && self.stream.peek(1).kind == ExpressionTokenKind::Equals
        {
            let name = self.stream.current().text.to_string();
            self.stream.advance();
            self.stream.advance();
            let value = self.parse_expression()?;
            return Ok(FunctionParameterToken::named(name, value));
        }
        Ok(FunctionParameterToken::positional(self.parse_expression()?))
    }

    // === $apply transformations ===

    /// Parse `aggregate(expr with verb as alias, ...)` after the keyword
    fn parse_aggregate(&mut self) -> Result<AggregateToken> {
        self.expect(ExpressionTokenKind::OpenParen, ODU0004, "'(' expected")?;

        let mut statements = Vec::new();
        loop {
            let expression = self.parse_expression()?;

            if !self.current_is_keyword("with") {
                let position = self.stream.current().position;
                return Err(self.grammar(ODU0003, "'with' expected", position));
            }
            self.stream.advance();

            let verb_token = self.stream.current();
            if verb_token.kind != ExpressionTokenKind::Identifier {
                return Err(self.identifier_expected(verb_token));
            }
            let Some(verb) = AggregationVerb::from_keyword(verb_token.text) else {
                return Err(self.grammar(
                    ODU0003,
                    format!("'{}' is not a recognized aggregation verb", verb_token.text),
                    verb_token.position,
                ));
            };
            self.stream.advance();

            if !self.current_is_keyword("as") {
                let position = self.stream.current().position;
                return Err(self.grammar(ODU0003, "'as' expected", position));
            }
            self.stream.advance();

            let alias_token = self.stream.current();
            if alias_token.kind != ExpressionTokenKind::Identifier {
                return Err(self.identifier_expected(alias_token));
            }
            statements.push(AggregateStatementToken::new(
                expression,
                verb,
                alias_token.text,
            )?);
            self.stream.advance();

            if self.stream.current().kind == ExpressionTokenKind::Comma {
                self.stream.advance();
            } else {
                break;
            }
        }
        self.expect(ExpressionTokenKind::CloseParen, ODU0005, "')' or ',' expected")?;
        AggregateToken::new(statements)
    }

    /// Parse `groupby((prop, ...)[, aggregate(...)])` after the keyword
    fn parse_group_by(&mut self) -> Result<GroupByToken> {
        self.expect(ExpressionTokenKind::OpenParen, ODU0004, "'(' expected")?;
        self.expect(ExpressionTokenKind::OpenParen, ODU0004, "'(' expected")?;

        let mut properties = Vec::new();
        loop {
            properties.push(self.parse_property_path()?);
            if self.stream.current().kind == ExpressionTokenKind::Comma {
                self.stream.advance();
            } else {
                break;
            }
        }
        self.expect(ExpressionTokenKind::CloseParen, ODU0005, "')' or ',' expected")?;

        let child = if self.stream.current().kind == ExpressionTokenKind::Comma {
            self.stream.advance();
            if !self.current_is_keyword("aggregate") {
                let position = self.stream.current().position;
                return Err(self.grammar(ODU0003, "'aggregate' expected", position));
            }
            self.stream.advance();
            Some(self.parse_aggregate()?)
        } else {
            None
        };
        self.expect(ExpressionTokenKind::CloseParen, ODU0005, "')' or ',' expected")?;
        GroupByToken::new(properties, child)
    }

    fn parse_property_path(&mut self) -> Result<PropertyPathToken> {
        let mut segments = Vec::new();
        loop {
            let token = self.stream.current();
            if token.kind != ExpressionTokenKind::Identifier {
                return Err(self.identifier_expected(token));
            }
            segments.push(token.text.to_string());
            self.stream.advance();
            if self.stream.current().kind == ExpressionTokenKind::Slash {
                self.stream.advance();
            } else {
                break;
            }
        }
        Ok(PropertyPathToken::new(segments))
    }
}

/// Rebuild a just-finished trailing step as a non-trailing one
///
/// A function-call step whose arguments are all named literals is
/// parenthesized key navigation, and carries them as named values.
fn promote_to_inner(expr: QueryToken) -> QueryToken {
    match expr {
        QueryToken::EndPath(end) => QueryToken::InnerPath(InnerPathToken::new(
            end.identifier,
            end.source.map(|source| *source),
            Vec::new(),
        )),
        QueryToken::FunctionCall(call)
            if !call.arguments.is_empty()
                && call
                    .arguments
                    .iter()
                    .all(|arg| arg.name.is_some() && matches!(*arg.value, QueryToken::Literal(_))) =>
        {
            let named_values = call
                .arguments
                .into_iter()
                .map(|arg| {
                    let QueryToken::Literal(literal) = *arg.value else {
                        unreachable!("checked above");
                    };
                    NamedValue::new(arg.name.expect("checked above"), literal)
                })
                .collect();
            QueryToken::InnerPath(InnerPathToken::new(
                call.name,
                call.source.map(|source| *source),
                named_values,
            ))
        }
        other => other,
    }
}

//! Recursive-descent parser for Java declaration signatures
//!
//! Accepts a single declaration header (type, field, method, or constructor)
//! as carved out of a compilation unit: modifiers, generics with bounded
//! wildcards, varargs, multi-dimensional arrays, qualified nested types, and
//! literal field initializers. A trailing `;` is tolerated; anything else
//! after the declaration is a syntax error.

use crate::error::{JavadoxError, Result};
use crate::signature::ast::{
    BoundKind, ConstructorDeclaration, Declaration, DeclarationKind, FieldDeclaration, JavaType,
    MethodDeclaration, Modifier, ModifierSet, Parameter, Primitive, TypeArgument, TypeDeclaration,
    TypeKind, TypeParameter, TypeReference, VariableDeclarator, WildcardBound,
};
use crate::signature::lexer::{Token, TokenStream};

/// Parse a member signature: a field, method, or constructor declaration
pub fn parse_member_signature(signature: &str) -> Result<Declaration> {
    let mut parser = Parser::new(signature)?;
    let declaration = parser.member()?;
    parser.finish()?;
    Ok(declaration)
}

/// Parse a type signature: a class, interface, enum, or annotation declaration
pub fn parse_type_signature(signature: &str) -> Result<TypeDeclaration> {
    let mut parser = Parser::new(signature)?;
    let declaration = parser.type_declaration()?;
    parser.finish()?;
    Ok(declaration)
}

/// Parse a signature and require a particular declaration kind
///
/// Fails with `UnexpectedDeclarationKind` when the signature parses cleanly
/// but to a different variant than expected.
pub fn parse_signature(signature: &str, expected: DeclarationKind) -> Result<Declaration> {
    let declaration = match expected {
        DeclarationKind::Type => Declaration::Type(parse_type_signature(signature)?),
        _ => parse_member_signature(signature)?,
    };

    if declaration.kind() != expected {
        return Err(JavadoxError::UnexpectedDeclarationKind {
            expected: expected.as_str(),
            found: declaration.kind().as_str(),
        });
    }

    Ok(declaration)
}

struct Parser<'src> {
    ts: TokenStream<'src>,
}

impl<'src> Parser<'src> {
    fn new(signature: &'src str) -> Result<Self> {
        Ok(Self {
            ts: TokenStream::tokenize(signature)?,
        })
    }

    /// Require that nothing but an optional `;` remains
    fn finish(&mut self) -> Result<()> {
        self.ts.eat(Token::Semi);
        if !self.ts.at_end() {
            return Err(self.ts.error_here(&format!(
                "unexpected {} after declaration",
                self.ts.peek().describe()
            )));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Type declarations
    // ------------------------------------------------------------------

    fn type_declaration(&mut self) -> Result<TypeDeclaration> {
        let modifiers = self.modifiers()?;

        let kind = if self.ts.peek() == Token::At {
            self.ts.advance();
            let word = self.ts.expect(Token::Ident)?;
            if word != "interface" {
                return Err(self.ts.error_here("expected 'interface' after '@'"));
            }
            TypeKind::Annotation
        } else {
            match self.ts.peek_text() {
                "class" => TypeKind::Class,
                "interface" => TypeKind::Interface,
                "enum" => TypeKind::Enum,
                _ => {
                    return Err(self
                        .ts
                        .error_here("expected 'class', 'interface', 'enum' or '@interface'"))
                }
            }
        };
        if kind != TypeKind::Annotation {
            self.ts.advance();
        }

        let name = self.identifier("type name")?;

        let type_parameters = if self.ts.peek() == Token::Lt {
            if !matches!(kind, TypeKind::Class | TypeKind::Interface) {
                return Err(self
                    .ts
                    .error_here("type parameters are only valid on classes and interfaces"));
            }
            self.type_parameters()?
        } else {
            Vec::new()
        };

        let mut extends = Vec::new();
        let mut implements = Vec::new();

        match kind {
            TypeKind::Class => {
                if self.eat_keyword("extends") {
                    extends.push(self.reference_type()?);
                }
                if self.eat_keyword("implements") {
                    implements = self.reference_type_list()?;
                }
            }
            TypeKind::Interface => {
                if self.eat_keyword("extends") {
                    extends = self.reference_type_list()?;
                }
                if self.peek_keyword("implements") {
                    return Err(self.ts.error_here("an interface cannot implement"));
                }
            }
            TypeKind::Enum => {
                if self.eat_keyword("implements") {
                    implements = self.reference_type_list()?;
                }
            }
            TypeKind::Annotation => {}
        }

        Ok(TypeDeclaration {
            modifiers,
            kind,
            name,
            type_parameters,
            extends,
            implements,
        })
    }

    // ------------------------------------------------------------------
    // Member declarations
    // ------------------------------------------------------------------

    fn member(&mut self) -> Result<Declaration> {
        let modifiers = self.modifiers()?;

        if matches!(self.ts.peek_text(), "class" | "interface" | "enum") {
            return Err(self
                .ts
                .error_here("type declarations are not member signatures"));
        }

        let type_parameters = if self.ts.peek() == Token::Lt {
            self.type_parameters()?
        } else {
            Vec::new()
        };

        // `Name(` with no preceding type is a constructor
        if self.ts.peek() == Token::Ident && self.ts.lookahead(1) == Token::LParen {
            let name = self.identifier("constructor name")?;
            let parameters = self.parameter_list()?;
            let throws = self.throws_clause()?;
            return Ok(Declaration::Constructor(ConstructorDeclaration {
                modifiers,
                type_parameters,
                name,
                parameters,
                throws,
            }));
        }

        let ty = self.java_type(true)?;
        let name = self.identifier("member name")?;

        if self.ts.peek() == Token::LParen {
            let parameters = self.parameter_list()?;
            let throws = self.throws_clause()?;
            return Ok(Declaration::Method(MethodDeclaration {
                modifiers,
                type_parameters,
                return_type: ty,
                name,
                parameters,
                throws,
            }));
        }

        if !type_parameters.is_empty() {
            return Err(self
                .ts
                .error_here("type parameters are not valid on a field"));
        }
        if ty == JavaType::Void {
            return Err(self.ts.error_here("a field cannot have type void"));
        }

        let mut declarators = vec![self.declarator_rest(name)?];
        while self.ts.eat(Token::Comma) {
            let name = self.identifier("declarator name")?;
            declarators.push(self.declarator_rest(name)?);
        }

        if declarators.len() > 1 {
            return Err(JavadoxError::MultipleDeclarators {
                count: declarators.len(),
            });
        }

        Ok(Declaration::Field(FieldDeclaration {
            modifiers,
            ty,
            declarators,
        }))
    }

    /// Parse the dimensions and optional initializer after a declarator name
    fn declarator_rest(&mut self, name: String) -> Result<VariableDeclarator> {
        let dimensions = self.dimensions()?;
        let initializer = if self.ts.eat(Token::Eq) {
            self.initializer()?
        } else {
            None
        };
        Ok(VariableDeclarator {
            name,
            dimensions,
            initializer,
        })
    }

    /// Capture a literal initializer; non-literal expressions are consumed
    /// and discarded (value shown only when it is a literal)
    fn initializer(&mut self) -> Result<Option<String>> {
        let literal = self.literal_text();
        if literal.is_some()
            && matches!(self.ts.peek(), Token::Comma | Token::Semi | Token::Eof)
        {
            return Ok(literal);
        }

        // Not a bare literal: swallow the expression up to a top-level
        // ',' or ';', tracking bracket depth
        let mut depth = 0usize;
        loop {
            match self.ts.peek() {
                Token::Eof => break,
                Token::Comma | Token::Semi if depth == 0 => break,
                Token::LParen | Token::LBracket | Token::LBrace => {
                    depth += 1;
                    self.ts.advance();
                }
                Token::RParen | Token::RBracket | Token::RBrace => {
                    depth = depth.saturating_sub(1);
                    self.ts.advance();
                }
                _ => {
                    self.ts.advance();
                }
            }
        }
        Ok(None)
    }

    /// Consume a single literal token if one is next, returning its text
    fn literal_text(&mut self) -> Option<String> {
        match self.ts.peek() {
            Token::Minus if self.ts.lookahead(1) == Token::Number => {
                self.ts.advance();
                let (_, text) = self.ts.advance();
                Some(format!("-{}", text))
            }
            token if token.is_literal() => {
                let (_, text) = self.ts.advance();
                Some(text.to_string())
            }
            Token::Ident if matches!(self.ts.peek_text(), "true" | "false" | "null") => {
                let (_, text) = self.ts.advance();
                Some(text.to_string())
            }
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Modifiers and annotations
    // ------------------------------------------------------------------

    fn modifiers(&mut self) -> Result<ModifierSet> {
        let mut set = ModifierSet::new();
        loop {
            match self.ts.peek() {
                // `@interface` starts an annotation type declaration, not an annotation
                Token::At => {
                    if self.ts.text_at(1) == Some("interface") {
                        break;
                    }
                    self.ts.advance();
                    let name = self.qualified_name()?;
                    self.skip_annotation_arguments();
                    set.add_annotation(&name);
                }
                Token::Ident => match Modifier::from_keyword(self.ts.peek_text()) {
                    Some(modifier) => {
                        self.ts.advance();
                        set.add(modifier);
                    }
                    None => break,
                },
                _ => break,
            }
        }
        Ok(set)
    }

    /// Skip `( ... )` after an annotation name, balancing parentheses
    fn skip_annotation_arguments(&mut self) {
        if self.ts.peek() != Token::LParen {
            return;
        }
        let mut depth = 0usize;
        loop {
            match self.ts.peek() {
                Token::Eof => break,
                Token::LParen => {
                    depth += 1;
                    self.ts.advance();
                }
                Token::RParen => {
                    depth -= 1;
                    self.ts.advance();
                    if depth == 0 {
                        break;
                    }
                }
                _ => {
                    self.ts.advance();
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    /// Parse any type; `void` is accepted only when `allow_void` is set
    fn java_type(&mut self, allow_void: bool) -> Result<JavaType> {
        if self.ts.peek() == Token::Ident {
            let word = self.ts.peek_text();
            if word == "void" {
                if !allow_void {
                    return Err(self.ts.error_here("'void' is not valid here"));
                }
                self.ts.advance();
                return Ok(JavaType::Void);
            }
            if let Some(kind) = Primitive::from_keyword(word) {
                self.ts.advance();
                let dimensions = self.dimensions()?;
                return Ok(JavaType::Primitive { kind, dimensions });
            }
        }
        Ok(JavaType::Reference(self.reference_type()?))
    }

    /// Parse a qualified, possibly-generic reference type chain with
    /// trailing array dimensions on the outermost link
    fn reference_type(&mut self) -> Result<TypeReference> {
        let mut segments = vec![self.type_segment()?];
        while self.ts.peek() == Token::Dot {
            self.ts.advance();
            segments.push(self.type_segment()?);
        }
        let dimensions = self.dimensions()?;

        // Fold the flat segment list into a sub_type chain, dimensions on
        // the head only
        let mut chain: Option<TypeReference> = None;
        for (name, arguments) in segments.into_iter().rev() {
            chain = Some(TypeReference {
                name,
                arguments,
                sub_type: chain.map(Box::new),
                dimensions: 0,
            });
        }
        let mut head = chain.expect("at least one segment");
        head.dimensions = dimensions;
        Ok(head)
    }

    fn type_segment(&mut self) -> Result<(String, Vec<TypeArgument>)> {
        let name = self.identifier("type name")?;
        let arguments = if self.ts.peek() == Token::Lt {
            self.type_arguments()?
        } else {
            Vec::new()
        };
        Ok((name, arguments))
    }

    fn type_arguments(&mut self) -> Result<Vec<TypeArgument>> {
        self.ts.expect(Token::Lt)?;
        let mut arguments = vec![self.type_argument()?];
        while self.ts.eat(Token::Comma) {
            arguments.push(self.type_argument()?);
        }
        self.ts.expect(Token::Gt)?;
        Ok(arguments)
    }

    fn type_argument(&mut self) -> Result<TypeArgument> {
        if self.ts.eat(Token::Question) {
            let bound = if self.peek_keyword("extends") || self.peek_keyword("super") {
                let kind = if self.eat_keyword("extends") {
                    BoundKind::Extends
                } else {
                    self.ts.advance();
                    BoundKind::Super
                };
                Some(WildcardBound {
                    kind,
                    bound: self.reference_type()?,
                })
            } else {
                None
            };
            return Ok(TypeArgument::Wildcard(bound));
        }

        if self.ts.peek() == Token::Ident && Primitive::from_keyword(self.ts.peek_text()).is_some()
        {
            return Err(self
                .ts
                .error_here("primitive types are not valid as type arguments"));
        }
        Ok(TypeArgument::Reference(self.reference_type()?))
    }

    fn reference_type_list(&mut self) -> Result<Vec<TypeReference>> {
        let mut types = vec![self.reference_type()?];
        while self.ts.eat(Token::Comma) {
            types.push(self.reference_type()?);
        }
        Ok(types)
    }

    fn type_parameters(&mut self) -> Result<Vec<TypeParameter>> {
        self.ts.expect(Token::Lt)?;
        let mut parameters = vec![self.type_parameter()?];
        while self.ts.eat(Token::Comma) {
            parameters.push(self.type_parameter()?);
        }
        self.ts.expect(Token::Gt)?;
        Ok(parameters)
    }

    fn type_parameter(&mut self) -> Result<TypeParameter> {
        let name = self.identifier("type parameter")?;
        let mut bounds = Vec::new();
        if self.eat_keyword("extends") {
            bounds.push(self.reference_type()?);
            while self.ts.eat(Token::Amp) {
                bounds.push(self.reference_type()?);
            }
        }
        Ok(TypeParameter { name, bounds })
    }

    fn dimensions(&mut self) -> Result<usize> {
        let mut count = 0;
        while self.ts.eat(Token::LBracket) {
            self.ts.expect(Token::RBracket)?;
            count += 1;
        }
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Parameters and throws
    // ------------------------------------------------------------------

    fn parameter_list(&mut self) -> Result<Vec<Parameter>> {
        self.ts.expect(Token::LParen)?;
        let mut parameters = Vec::new();
        if self.ts.peek() != Token::RParen {
            parameters.push(self.parameter()?);
            while self.ts.eat(Token::Comma) {
                parameters.push(self.parameter()?);
            }
        }
        self.ts.expect(Token::RParen)?;
        Ok(parameters)
    }

    fn parameter(&mut self) -> Result<Parameter> {
        // Parameter-level annotations and `final` are accepted and dropped
        loop {
            if self.ts.peek() == Token::At {
                self.ts.advance();
                self.qualified_name()?;
                self.skip_annotation_arguments();
            } else if self.peek_keyword("final") {
                self.ts.advance();
            } else {
                break;
            }
        }

        let mut ty = self.java_type(false)?;
        let varargs = self.ts.eat(Token::Ellipsis);
        let name = self.identifier("parameter name")?;

        // C-style trailing brackets add to the parameter type
        let trailing = self.dimensions()?;
        if trailing > 0 {
            match &mut ty {
                JavaType::Primitive { dimensions, .. } => *dimensions += trailing,
                JavaType::Reference(reference) => reference.dimensions += trailing,
                JavaType::Void => unreachable!("void rejected above"),
            }
        }

        Ok(Parameter { ty, name, varargs })
    }

    fn throws_clause(&mut self) -> Result<Vec<TypeReference>> {
        if self.eat_keyword("throws") {
            self.reference_type_list()
        } else {
            Ok(Vec::new())
        }
    }

    // ------------------------------------------------------------------
    // Small helpers
    // ------------------------------------------------------------------

    fn identifier(&mut self, what: &str) -> Result<String> {
        if self.ts.peek() == Token::Ident {
            let (_, text) = self.ts.advance();
            Ok(text.to_string())
        } else {
            Err(self.ts.error_here(&format!(
                "expected {}, found {}",
                what,
                self.ts.peek().describe()
            )))
        }
    }

    fn qualified_name(&mut self) -> Result<String> {
        let mut name = self.identifier("name")?;
        while self.ts.peek() == Token::Dot && self.ts.lookahead(1) == Token::Ident {
            self.ts.advance();
            name.push('.');
            name.push_str(self.ts.advance().1);
        }
        Ok(name)
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        self.ts.peek() == Token::Ident && self.ts.peek_text() == keyword
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_keyword(keyword) {
            self.ts.advance();
            true
        } else {
            false
        }
    }
}

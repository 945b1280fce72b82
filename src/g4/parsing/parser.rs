//! ANTLR v4 grammar parser
//!
//! The rules below follow the structure of ANTLR's own `ANTLRv4Parser.g4`
//! closely enough that the resulting tree has the nodes the formatter keys on:
//! the grammar root, options/tokens/channels blocks, modes, parser and lexer
//! rules, labeled alternatives and action blocks.
//!
//! Recovery:
//!     A rule that does not parse is not an error for the formatter. Instead of
//!     failing, [`recovered`] takes every token up to and including the next `;`
//!     and wraps them in a [`NodeKind::Recovered`] node with error leaves. A
//!     `mode` keyword without a complete header is recovered the same way. Only
//!     a broken grammar header makes the whole parse fail.
use chumsky::prelude::*;

use super::combinators::{any_of, chain, many, many1, node, opt, tok, ParserError, Rule};
use super::tree::{NodeKind as N, SyntaxElement, SyntaxNode};
use crate::g4::lexing::{Token, TokenKind as T};

/// Parse a complete grammar file
pub fn grammar_spec() -> impl Parser<Token, SyntaxNode, Error = ParserError> {
    chain!(
        many(tok(T::DocComment)),
        grammar_decl(),
        many(prequel_construct()),
        rules(),
        many(mode_spec()),
        tok(T::Eof),
    )
    .map(|parts| SyntaxNode::new(N::GrammarSpec, parts))
    .then_ignore(end())
}

fn grammar_decl() -> Rule {
    node(N::GrammarDecl, chain!(grammar_type(), identifier(), tok(T::Semi)))
}

fn grammar_type() -> Rule {
    node(
        N::GrammarType,
        chain!(any_of(&[T::Lexer, T::Parser]), tok(T::Grammar)).or(tok(T::Grammar)),
    )
}

fn identifier() -> Rule {
    node(N::Identifier, any_of(&[T::RuleRef, T::TokenRef]))
}

fn prequel_construct() -> Rule {
    options_spec()
        .or(delegate_grammars())
        .or(tokens_spec())
        .or(channels_spec())
        .or(action())
        .boxed()
}

// Options, imports, tokens, channels

fn options_spec() -> Rule {
    node(
        N::OptionsSpec,
        chain!(
            tok(T::Options),
            tok(T::LBrace),
            many(chain!(option(), tok(T::Semi))),
            tok(T::RBrace),
        ),
    )
}

fn option() -> Rule {
    node(N::OptionEntry, chain!(identifier(), tok(T::Assign), option_value()))
}

fn option_value() -> Rule {
    node(
        N::OptionValue,
        chain!(identifier(), many(chain!(tok(T::Dot), identifier())))
            .or(tok(T::StringLiteral))
            .or(action_block())
            .or(tok(T::Int)),
    )
}

fn delegate_grammars() -> Rule {
    node(
        N::DelegateGrammars,
        chain!(
            tok(T::Import),
            delegate_grammar(),
            many(chain!(tok(T::Comma), delegate_grammar())),
            tok(T::Semi),
        ),
    )
}

fn delegate_grammar() -> Rule {
    node(
        N::DelegateGrammar,
        chain!(identifier(), opt(chain!(tok(T::Assign), identifier()))),
    )
}

fn tokens_spec() -> Rule {
    node(
        N::TokensSpec,
        chain!(tok(T::Tokens), tok(T::LBrace), opt(id_list()), tok(T::RBrace)),
    )
}

fn channels_spec() -> Rule {
    node(
        N::ChannelsSpec,
        chain!(tok(T::Channels), tok(T::LBrace), opt(id_list()), tok(T::RBrace)),
    )
}

fn id_list() -> Rule {
    node(
        N::IdList,
        chain!(
            identifier(),
            many(chain!(tok(T::Comma), identifier())),
            opt(tok(T::Comma)),
        ),
    )
}

// Actions

fn action() -> Rule {
    node(
        N::Action,
        chain!(
            tok(T::At),
            opt(chain!(action_scope_name(), tok(T::ColonColon))),
            identifier(),
            action_block(),
        ),
    )
}

fn action_scope_name() -> Rule {
    node(
        N::ActionScopeName,
        identifier().or(any_of(&[T::Lexer, T::Parser])),
    )
}

fn action_block() -> Rule {
    node(
        N::ActionBlock,
        chain!(
            tok(T::BeginAction),
            many(tok(T::ActionContent)),
            tok(T::EndAction),
        ),
    )
}

// Rules and modes

fn rules() -> Rule {
    node(N::Rules, many(rule_spec().or(recovered())))
}

fn mode_spec() -> Rule {
    node(
        N::ModeSpec,
        chain!(
            tok(T::Mode),
            identifier(),
            tok(T::Semi),
            many(lexer_rule_spec().or(recovered())),
        ),
    )
}

fn rule_spec() -> Rule {
    node(N::RuleSpec, parser_rule_spec(block()).or(lexer_rule_spec()))
}

/// Tokens up to and including the next `;`, kept as they are
///
/// A `mode` keyword is only taken when it does not open a complete
/// `mode <id> ;` header, so well-formed modes still end the run.
fn recovered() -> Rule {
    let stray = filter(|token: &Token| !matches!(token.kind, T::Semi | T::Eof | T::Mode))
        .map(|token: Token| vec![SyntaxElement::Error(token.index)]);
    let stray_mode = chain!(tok(T::Mode), identifier(), tok(T::Semi))
        .not()
        .try_map(|token: Token, span| match token.kind {
            T::Mode => Ok(vec![SyntaxElement::Error(token.index)]),
            _ => Err(Simple::custom(span, "expected a stray `mode`")),
        });
    let semi = filter(|token: &Token| token.kind == T::Semi)
        .map(|token: Token| vec![SyntaxElement::Error(token.index)]);
    let piece: Rule = action_block().or(stray).or(stray_mode).boxed();
    node(
        N::Recovered,
        chain!(many(piece.clone()), semi).or(many1(piece)),
    )
}

// Parser rules

fn parser_rule_spec(block: Rule) -> Rule {
    node(
        N::ParserRuleSpec,
        chain!(
            opt(tok(T::DocComment)),
            opt(rule_modifiers()),
            tok(T::RuleRef),
            opt(tok(T::CharSet)),
            opt(rule_returns()),
            opt(throws_spec()),
            opt(locals_spec()),
            many(options_spec().or(rule_action())),
            tok(T::Colon),
            node(N::RuleBlock, rule_alt_list(block)),
            tok(T::Semi),
            exception_group(),
        ),
    )
}

fn rule_modifiers() -> Rule {
    node(
        N::RuleModifiers,
        many1(any_of(&[T::Public, T::Private, T::Protected, T::Fragment])),
    )
}

fn rule_returns() -> Rule {
    node(N::RuleReturns, chain!(tok(T::Returns), tok(T::CharSet)))
}

fn throws_spec() -> Rule {
    node(
        N::ThrowsSpec,
        chain!(
            tok(T::Throws),
            identifier(),
            many(chain!(tok(T::Comma), identifier())),
        ),
    )
}

fn locals_spec() -> Rule {
    node(N::LocalsSpec, chain!(tok(T::Locals), tok(T::CharSet)))
}

fn rule_action() -> Rule {
    node(
        N::RuleAction,
        chain!(tok(T::At), identifier(), action_block()),
    )
}

fn exception_group() -> Rule {
    node(
        N::ExceptionGroup,
        chain!(many(exception_handler()), opt(finally_clause())),
    )
}

fn exception_handler() -> Rule {
    node(
        N::ExceptionHandler,
        chain!(tok(T::Catch), tok(T::CharSet), action_block()),
    )
}

fn finally_clause() -> Rule {
    node(N::FinallyClause, chain!(tok(T::Finally), action_block()))
}

fn rule_alt_list(block: Rule) -> Rule {
    node(
        N::RuleAltList,
        chain!(
            labeled_alt(block.clone()),
            many(chain!(tok(T::Or), labeled_alt(block))),
        ),
    )
}

fn labeled_alt(block: Rule) -> Rule {
    node(
        N::LabeledAlt,
        chain!(alternative(block), opt(chain!(tok(T::Pound), identifier()))),
    )
}

/// `( ... )` sub-rule, recursive through its alternatives
fn block() -> Rule {
    recursive(|block: Recursive<'static, Token, Vec<SyntaxElement>, ParserError>| {
        let block: Rule = block.boxed();
        node(
            N::Block,
            chain!(
                tok(T::LParen),
                opt(chain!(opt(options_spec()), many(rule_action()), tok(T::Colon))),
                alt_list(block),
                tok(T::RParen),
            ),
        )
    })
    .boxed()
}

fn alt_list(block: Rule) -> Rule {
    node(
        N::AltList,
        chain!(
            alternative(block.clone()),
            many(chain!(tok(T::Or), alternative(block))),
        ),
    )
}

fn alternative(block: Rule) -> Rule {
    node(
        N::Alternative,
        chain!(opt(element_options()), many(element(block))),
    )
}

fn element(block: Rule) -> Rule {
    let labeled = chain!(labeled_element(block.clone()), opt(ebnf_suffix()));
    let atom = chain!(atom(), opt(ebnf_suffix()));
    let sub_rule = chain!(block, opt(ebnf_suffix()));
    let predicate = chain!(action_block(), opt(tok(T::Question)));
    node(N::Element, labeled.or(atom).or(sub_rule).or(predicate))
}

fn labeled_element(block: Rule) -> Rule {
    node(
        N::LabeledElement,
        chain!(
            identifier(),
            any_of(&[T::Assign, T::PlusAssign]),
            atom().or(block),
        ),
    )
}

fn ebnf_suffix() -> Rule {
    node(
        N::EbnfSuffix,
        chain!(any_of(&[T::Question, T::Star, T::Plus]), opt(tok(T::Question))),
    )
}

fn atom() -> Rule {
    node(
        N::Atom,
        terminal()
            .or(rule_ref())
            .or(not_set())
            .or(chain!(tok(T::Dot), opt(element_options()))),
    )
}

fn terminal() -> Rule {
    node(
        N::Terminal,
        chain!(any_of(&[T::TokenRef, T::StringLiteral]), opt(element_options())),
    )
}

fn rule_ref() -> Rule {
    node(
        N::RuleRef,
        chain!(tok(T::RuleRef), opt(tok(T::CharSet)), opt(element_options())),
    )
}

fn not_set() -> Rule {
    node(N::NotSet, chain!(tok(T::Not), set_element().or(block_set())))
}

fn block_set() -> Rule {
    node(
        N::BlockSet,
        chain!(
            tok(T::LParen),
            set_element(),
            many(chain!(tok(T::Or), set_element())),
            tok(T::RParen),
        ),
    )
}

fn set_element() -> Rule {
    node(
        N::SetElement,
        character_range()
            .or(chain!(any_of(&[T::TokenRef, T::StringLiteral]), opt(element_options())))
            .or(tok(T::CharSet)),
    )
}

fn character_range() -> Rule {
    node(
        N::CharacterRange,
        chain!(tok(T::StringLiteral), tok(T::Range), tok(T::StringLiteral)),
    )
}

fn element_options() -> Rule {
    node(
        N::ElementOptions,
        chain!(
            tok(T::Lt),
            element_option(),
            many(chain!(tok(T::Comma), element_option())),
            tok(T::Gt),
        ),
    )
}

fn element_option() -> Rule {
    node(
        N::ElementOption,
        chain!(
            identifier(),
            opt(chain!(tok(T::Assign), identifier().or(tok(T::StringLiteral)))),
        ),
    )
}

// Lexer rules

fn lexer_rule_spec() -> Rule {
    node(
        N::LexerRuleSpec,
        chain!(
            opt(tok(T::DocComment)),
            opt(tok(T::Fragment)),
            tok(T::TokenRef),
            opt(options_spec()),
            tok(T::Colon),
            node(N::LexerRuleBlock, lexer_alt_list(lexer_block())),
            tok(T::Semi),
        ),
    )
}

/// `( ... )` inside a lexer rule, recursive through its alternatives
fn lexer_block() -> Rule {
    recursive(|block: Recursive<'static, Token, Vec<SyntaxElement>, ParserError>| {
        let block: Rule = block.boxed();
        node(
            N::LexerBlock,
            chain!(
                tok(T::LParen),
                opt(chain!(options_spec(), tok(T::Colon))),
                lexer_alt_list(block),
                tok(T::RParen),
            ),
        )
    })
    .boxed()
}

fn lexer_alt_list(block: Rule) -> Rule {
    node(
        N::LexerAltList,
        chain!(
            lexer_alt(block.clone()),
            many(chain!(tok(T::Or), lexer_alt(block))),
        ),
    )
}

fn lexer_alt(block: Rule) -> Rule {
    node(
        N::LexerAlt,
        chain!(many(lexer_element(block)), opt(lexer_commands())),
    )
}

fn lexer_element(block: Rule) -> Rule {
    let labeled = chain!(labeled_lexer_element(block.clone()), opt(ebnf_suffix()));
    let atom = chain!(lexer_atom(), opt(ebnf_suffix()));
    let sub_rule = chain!(block, opt(ebnf_suffix()));
    let predicate = chain!(action_block(), opt(tok(T::Question)));
    node(N::LexerElement, labeled.or(atom).or(sub_rule).or(predicate))
}

fn labeled_lexer_element(block: Rule) -> Rule {
    node(
        N::LabeledLexerElement,
        chain!(
            identifier(),
            any_of(&[T::Assign, T::PlusAssign]),
            lexer_atom().or(block),
        ),
    )
}

fn lexer_atom() -> Rule {
    node(
        N::LexerAtom,
        character_range()
            .or(terminal())
            .or(not_set())
            .or(tok(T::CharSet))
            .or(chain!(tok(T::Dot), opt(element_options()))),
    )
}

fn lexer_commands() -> Rule {
    node(
        N::LexerCommands,
        chain!(
            tok(T::RArrow),
            lexer_command(),
            many(chain!(tok(T::Comma), lexer_command())),
        ),
    )
}

fn lexer_command() -> Rule {
    node(
        N::LexerCommand,
        chain!(
            identifier().or(tok(T::Mode)),
            opt(chain!(
                tok(T::LParen),
                identifier().or(tok(T::Int)),
                tok(T::RParen),
            )),
        ),
    )
}

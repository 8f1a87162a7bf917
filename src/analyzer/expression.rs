//! Expression statements: `<path> = <right-hand side>`.
//!
//! Analysis runs in two passes over the statement's tokens.
//!
//! Path folding turns every dotted identifier chain into one [`Operand`]
//! named by its full path (`p.pos.x`) and typed by its last link, and turns
//! literals into operands as well.
//!
//! Reduction then works on the folded right-hand side, one precedence tier
//! at a time. Every tier is reduced left to right until none of its
//! operators is left, and each step replaces an operator and its operands
//! with the temp its handler returns.
//!
//! |Tier|Operators|Operands
//! --|--|--
//! 1|`not`|bool
//! 2|`*` `/`|same numeric type
//! 3|`+` `-`|same numeric type
//! 4|`==` `!=` `<` `<=` `>` `>=`|same type
//! 5|`and`|bool
//! 6|`or`|bool
//!
//! Before any reduction the right-hand side passes a gate: comparisons,
//! logical operators and boolean literals need a `bool` left side, and at
//! most one comparison is allowed.

use std::ops::Range;

use anyhow::anyhow;

use super::{handlers, line_at};
use crate::{error::analyzer::{AnalysisError, AnalysisErrorType, AnalyzerError}, instruction::{InstructionTable, TempVar}, symbols::{Category, Identifier, SymbolId, SymbolTable}, token::{Operator, Token}};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
	/// A variable or a field path.
	Path,
	/// A numeric literal.
	Constant,
	/// `True` or `False`.
	Boolean,
	/// A handler result.
	Temp,
}

/// Anything that can stand on either side of an operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
	/// Text used in emitted instructions.
	pub repr:   String,
	pub r#type: SymbolId,
	pub kind:   OperandKind,
}

impl From<TempVar> for Operand {
	fn from(temp: TempVar) -> Self { Self { repr: temp.name, r#type: temp.r#type, kind: OperandKind::Temp } }
}

/// A folded token.
#[derive(Debug, Clone, PartialEq)]
enum Item {
	Operand(Operand),
	Operator(Operator),
	Assign,
}

impl Item {
	fn describe(&self) -> &'static str {
		match self {
			Item::Operand(_) => "operand",
			Item::Operator(operator) => operator.symbol(),
			Item::Assign => "=",
		}
	}
}

/// Analyzes expression statements and emits their instructions.
pub(crate) struct ExpressionAnalyzer<'a> {
	symbols:      &'a SymbolTable,
	instructions: &'a mut InstructionTable,
	/// Line of the statement under analysis
	line:         usize,
}

impl<'a> ExpressionAnalyzer<'a> {
	pub fn new(symbols: &'a SymbolTable, instructions: &'a mut InstructionTable) -> Self {
		Self { symbols, instructions, line: 0 }
	}

	/// Analyze the assignment in `tokens[span]`.
	pub fn analyze(&mut self, tokens: &[Token], span: Range<usize>) -> Result<(), AnalyzerError> {
		self.line = line_at(tokens, span.start);
		let items = self.fold(&tokens[span])?;

		let assignments = items.iter().filter(|item| **item == Item::Assign).count();
		if assignments != 1 {
			return Err(self.error(AnalysisErrorType::AssignmentCount(assignments)));
		}
		if items.last() == Some(&Item::Assign) {
			return Err(self.error(AnalysisErrorType::MissingRightHandSide));
		}
		let position = items.iter().position(|item| *item == Item::Assign).unwrap_or_default();
		let left = match &items[..position] {
			[Item::Operand(operand)] if operand.kind == OperandKind::Path => operand.clone(),
			[] => return Err(self.error(AnalysisErrorType::WrongToken("="))),
			[_, extra, ..] => return Err(self.error(AnalysisErrorType::WrongToken(extra.describe()))),
			[other] => return Err(self.error(AnalysisErrorType::WrongToken(other.describe()))),
		};

		let right = self.reduce(items[position + 1..].to_vec(), left.r#type)?;
		if right.r#type != left.r#type {
			return Err(self.incompatible(left.r#type, right.r#type));
		}
		handlers::assignment(self.instructions, &left.repr, &right.repr);
		Ok(())
	}

	/// Folds a bare identifier path, as found after `match`.
	pub fn resolve(&mut self, tokens: &[Token], span: Range<usize>) -> Result<Operand, AnalyzerError> {
		self.line = line_at(tokens, span.start);
		match self.fold(&tokens[span])?.as_slice() {
			[Item::Operand(operand)] if operand.kind == OperandKind::Path => Ok(operand.clone()),
			_ => Err(self.error(AnalysisErrorType::ExpectedIdentifier)),
		}
	}

	/// Replaces identifier paths and literals with operands.
	fn fold(&self, tokens: &[Token]) -> Result<Vec<Item>, AnalyzerError> {
		let mut items = Vec::with_capacity(tokens.len());
		// The identifier reached so far and its dotted name
		let mut path: Option<(&Identifier, String)> = None;

		for (index, token) in tokens.iter().enumerate() {
			let prev = index.checked_sub(1).map(|i| &tokens[i]);
			match token {
				Token::Identifier(id) => {
					let name = self.symbols.name(*id);
					path = Some(match path.take() {
						None => {
							let identifier = self.symbols.get(*id);
							match identifier.category {
								None => return Err(self.error(AnalysisErrorType::UnknownIdentifier(name.to_string()))),
								Some(Category::Type) => {
									return Err(self.error(AnalysisErrorType::ExpectedVarName));
								}
								Some(Category::Var) => (identifier, name.to_string()),
							}
						}
						Some((current, full_name)) => {
							if prev != Some(&Token::Dot) {
								return Err(self.error(AnalysisErrorType::WrongToken("identifier")));
							}
							let field = current
								.field(name)
								.ok_or_else(|| self.error(AnalysisErrorType::UnknownField(format!("{full_name}.{name}"))))?;
							(field, format!("{full_name}.{name}"))
						}
					});
				}
				Token::Dot => {
					let next = tokens.get(index + 1);
					if !prev.is_some_and(Token::is_identifier) || !next.is_some_and(Token::is_identifier) {
						return Err(self.error(AnalysisErrorType::WrongToken(".")));
					}
				}
				token => {
					if let Some((identifier, full_name)) = path.take() {
						items.push(Item::Operand(self.path_operand(identifier, full_name)?));
					}
					items.push(match token {
						Token::Constant(constant) => Item::Operand(Operand {
							repr:   constant.text.clone(),
							r#type: constant.r#type,
							kind:   OperandKind::Constant,
						}),
						Token::True | Token::False => Item::Operand(Operand {
							repr:   token.describe().to_string(),
							r#type: SymbolTable::BOOL,
							kind:   OperandKind::Boolean,
						}),
						Token::Assign => Item::Assign,
						token => match Operator::from_token(token) {
							Some(operator) => Item::Operator(operator),
							None => return Err(self.error(AnalysisErrorType::WrongToken(token.describe()))),
						},
					});
				}
			}
		}
		if let Some((identifier, full_name)) = path {
			items.push(Item::Operand(self.path_operand(identifier, full_name)?));
		}
		Ok(items)
	}

	fn path_operand(&self, identifier: &Identifier, full_name: String) -> Result<Operand, AnalyzerError> {
		let r#type = identifier.r#type.ok_or_else(|| anyhow!("Variable '{full_name}' has no type"))?;
		Ok(Operand { repr: full_name, r#type, kind: OperandKind::Path })
	}

	/// Reduces a right-hand side to a single operand.
	fn reduce(&mut self, mut items: Vec<Item>, left_type: SymbolId) -> Result<Operand, AnalyzerError> {
		let relations =
			items.iter().filter(|item| matches!(item, Item::Operator(operator) if operator.is_relational())).count();
		let logical = items.iter().any(|item| match item {
			Item::Operator(operator) => operator.is_logical(),
			Item::Operand(operand) => operand.kind == OperandKind::Boolean,
			Item::Assign => false,
		});
		if (relations > 0 || logical) && left_type != SymbolTable::BOOL {
			return Err(self.incompatible(left_type, SymbolTable::BOOL));
		}
		if relations > 1 {
			return Err(self.error(AnalysisErrorType::RelationCount(relations)));
		}

		self.reduce_not(&mut items)?;
		self.reduce_binary(&mut items, |operator| matches!(operator, Operator::Star | Operator::Slash))?;
		self.reduce_binary(&mut items, |operator| matches!(operator, Operator::Plus | Operator::Minus))?;
		self.reduce_binary(&mut items, Operator::is_relational)?;
		self.reduce_binary(&mut items, |operator| operator == Operator::And)?;
		self.reduce_binary(&mut items, |operator| operator == Operator::Or)?;

		match items.as_slice() {
			[Item::Operand(operand)] => Ok(operand.clone()),
			_ => Err(self.error(AnalysisErrorType::WrongExpression)),
		}
	}

	/// Reduces the innermost `not` until none is left.
	fn reduce_not(&mut self, items: &mut Vec<Item>) -> Result<(), AnalyzerError> {
		while items.contains(&Item::Operator(Operator::Not)) {
			let position = items
				.windows(2)
				.position(|pair| matches!(pair, [Item::Operator(Operator::Not), Item::Operand(_)]))
				.ok_or_else(|| self.error(AnalysisErrorType::WrongToken("not")))?;
			let Item::Operand(operand) = &items[position + 1] else {
				return Err(anyhow!("Operand expected after not").into());
			};
			if operand.r#type != SymbolTable::BOOL {
				return Err(self.wrong_type(Operator::Not, operand.r#type));
			}
			let result = handlers::not(self.instructions, operand);
			items.splice(position..position + 2, [Item::Operand(result)]);
		}
		Ok(())
	}

	/// Reduces every operator of one tier, leftmost first.
	fn reduce_binary(&mut self, items: &mut Vec<Item>, tier: impl Fn(Operator) -> bool) -> Result<(), AnalyzerError> {
		while let Some((position, operator)) = items.iter().enumerate().find_map(|(position, item)| match item {
			Item::Operator(operator) if tier(*operator) => Some((position, *operator)),
			_ => None,
		}) {
			let (Some(Item::Operand(left)), Some(Item::Operand(right))) =
				(position.checked_sub(1).map(|i| &items[i]), items.get(position + 1))
			else {
				return Err(self.error(AnalysisErrorType::WrongToken(operator.symbol())));
			};
			let result = self.binary(operator, left, right)?;
			items.splice(position - 1..position + 2, [Item::Operand(result)]);
		}
		Ok(())
	}

	/// Type checks one binary operation and emits it.
	fn binary(&mut self, operator: Operator, left: &Operand, right: &Operand) -> Result<Operand, AnalyzerError> {
		match operator {
			Operator::And | Operator::Or => {
				if let Some(wrong) = [left, right].into_iter().find(|operand| operand.r#type != SymbolTable::BOOL) {
					return Err(self.wrong_type(operator, wrong.r#type));
				}
				Ok(if operator == Operator::And {
					handlers::and(self.instructions, left, right)
				} else {
					handlers::or(self.instructions, left, right)
				})
			}
			operator if operator.is_arithmetic() => {
				if let Some(wrong) = [left, right].into_iter().find(|operand| !SymbolTable::is_numeric(operand.r#type)) {
					return Err(self.wrong_type(operator, wrong.r#type));
				}
				if left.r#type != right.r#type {
					return Err(self.incompatible(left.r#type, right.r#type));
				}
				Ok(handlers::arithmetic(self.instructions, operator, left, right))
			}
			operator if operator.is_relational() => {
				if left.r#type != right.r#type {
					return Err(self.incompatible(left.r#type, right.r#type));
				}
				Ok(handlers::relational(self.instructions, operator, left, right))
			}
			operator => Err(anyhow!("'{operator}' is not a binary operator").into()),
		}
	}

	fn error(&self, r#type: AnalysisErrorType) -> AnalyzerError { AnalysisError::new(self.line, r#type).into() }

	fn incompatible(&self, expected: SymbolId, found: SymbolId) -> AnalyzerError {
		self.error(AnalysisErrorType::TypeIncompatibility {
			expected: self.symbols.name(expected).to_string(),
			found:    self.symbols.name(found).to_string(),
		})
	}

	fn wrong_type(&self, operator: Operator, found: SymbolId) -> AnalyzerError {
		self.error(AnalysisErrorType::WrongTypeForOperator {
			operator: operator.symbol(),
			found:    self.symbols.name(found).to_string(),
		})
	}
}

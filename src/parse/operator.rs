use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::operator::{OpName, Operator, OPERATORS};
use crate::token::TokenType;

lazy_static! {
  pub static ref MULTARY_OPERATOR_MAPPING: HashMap<TokenType, &'static Operator> = {
    let mut map = HashMap::<TokenType, &'static Operator>::new();
    map.insert(TokenType::Plus, &OPERATORS[&OpName::Addition]);
    map.insert(TokenType::Equals, &OPERATORS[&OpName::Assignment]);
    map.insert(TokenType::PlusEquals, &OPERATORS[&OpName::AssignmentAddition]);
    map.insert(TokenType::AmpersandEquals, &OPERATORS[&OpName::AssignmentBitwiseAnd]);
    map.insert(TokenType::ChevronLeftChevronLeftEquals, &OPERATORS[&OpName::AssignmentBitwiseLeftShift]);
    map.insert(TokenType::BarEquals, &OPERATORS[&OpName::AssignmentBitwiseOr]);
    map.insert(TokenType::ChevronRightChevronRightEquals, &OPERATORS[&OpName::AssignmentBitwiseRightShift]);
    map.insert(TokenType::ChevronRightChevronRightChevronRightEquals, &OPERATORS[&OpName::AssignmentBitwiseUnsignedRightShift]);
    map.insert(TokenType::CaretEquals, &OPERATORS[&OpName::AssignmentBitwiseXor]);
    map.insert(TokenType::SlashEquals, &OPERATORS[&OpName::AssignmentDivision]);
    map.insert(TokenType::AsteriskAsteriskEquals, &OPERATORS[&OpName::AssignmentExponentiation]);
    map.insert(TokenType::AmpersandAmpersandEquals, &OPERATORS[&OpName::AssignmentLogicalAnd]);
    map.insert(TokenType::BarBarEquals, &OPERATORS[&OpName::AssignmentLogicalOr]);
    map.insert(TokenType::AsteriskEquals, &OPERATORS[&OpName::AssignmentMultiplication]);
    map.insert(TokenType::QuestionQuestionEquals, &OPERATORS[&OpName::AssignmentNullishCoalescing]);
    map.insert(TokenType::PercentEquals, &OPERATORS[&OpName::AssignmentRemainder]);
    map.insert(TokenType::HyphenEquals, &OPERATORS[&OpName::AssignmentSubtraction]);
    map.insert(TokenType::Ampersand, &OPERATORS[&OpName::BitwiseAnd]);
    map.insert(TokenType::ChevronLeftChevronLeft, &OPERATORS[&OpName::BitwiseLeftShift]);
    map.insert(TokenType::Bar, &OPERATORS[&OpName::BitwiseOr]);
    map.insert(TokenType::ChevronRightChevronRight, &OPERATORS[&OpName::BitwiseRightShift]);
    map.insert(TokenType::ChevronRightChevronRightChevronRight, &OPERATORS[&OpName::BitwiseUnsignedRightShift]);
    map.insert(TokenType::Caret, &OPERATORS[&OpName::BitwiseXor]);
    map.insert(TokenType::ParenthesisOpen, &OPERATORS[&OpName::Call]);
    map.insert(TokenType::Comma, &OPERATORS[&OpName::Comma]);
    map.insert(TokenType::BracketOpen, &OPERATORS[&OpName::ComputedMemberAccess]);
    map.insert(TokenType::Question, &OPERATORS[&OpName::Conditional]);
    map.insert(TokenType::Slash, &OPERATORS[&OpName::Division]);
    map.insert(TokenType::EqualsEquals, &OPERATORS[&OpName::Equality]);
    map.insert(TokenType::AsteriskAsterisk, &OPERATORS[&OpName::Exponentiation]);
    map.insert(TokenType::ChevronRight, &OPERATORS[&OpName::GreaterThan]);
    map.insert(TokenType::ChevronRightEquals, &OPERATORS[&OpName::GreaterThanOrEqual]);
    map.insert(TokenType::KeywordIn, &OPERATORS[&OpName::In]);
    map.insert(TokenType::ExclamationEquals, &OPERATORS[&OpName::Inequality]);
    map.insert(TokenType::KeywordInstanceof, &OPERATORS[&OpName::Instanceof]);
    map.insert(TokenType::ChevronLeft, &OPERATORS[&OpName::LessThan]);
    map.insert(TokenType::ChevronLeftEquals, &OPERATORS[&OpName::LessThanOrEqual]);
    map.insert(TokenType::AmpersandAmpersand, &OPERATORS[&OpName::LogicalAnd]);
    map.insert(TokenType::BarBar, &OPERATORS[&OpName::LogicalOr]);
    map.insert(TokenType::Dot, &OPERATORS[&OpName::MemberAccess]);
    map.insert(TokenType::Asterisk, &OPERATORS[&OpName::Multiplication]);
    map.insert(TokenType::QuestionQuestion, &OPERATORS[&OpName::NullishCoalescing]);
    map.insert(TokenType::QuestionDot, &OPERATORS[&OpName::OptionalChainingMemberAccess]);
    map.insert(TokenType::QuestionDotBracketOpen, &OPERATORS[&OpName::OptionalChainingComputedMemberAccess]);
    map.insert(TokenType::QuestionDotParenthesisOpen, &OPERATORS[&OpName::OptionalChainingCall]);
    map.insert(TokenType::Percent, &OPERATORS[&OpName::Remainder]);
    map.insert(TokenType::EqualsEqualsEquals, &OPERATORS[&OpName::StrictEquality]);
    map.insert(TokenType::ExclamationEqualsEquals, &OPERATORS[&OpName::StrictInequality]);
    map.insert(TokenType::Hyphen, &OPERATORS[&OpName::Subtraction]);
    map
  };

  pub static ref UNARY_OPERATOR_MAPPING: HashMap<TokenType, &'static Operator> = {
    let mut map = HashMap::<TokenType, &'static Operator>::new();
    // Postfix increment/decrement and `yield*` are dispatched manually.
    map.insert(TokenType::KeywordAwait, &OPERATORS[&OpName::Await]);
    map.insert(TokenType::Tilde, &OPERATORS[&OpName::BitwiseNot]);
    map.insert(TokenType::KeywordDelete, &OPERATORS[&OpName::Delete]);
    map.insert(TokenType::Exclamation, &OPERATORS[&OpName::LogicalNot]);
    map.insert(TokenType::KeywordNew, &OPERATORS[&OpName::New]);
    map.insert(TokenType::HyphenHyphen, &OPERATORS[&OpName::PrefixDecrement]);
    map.insert(TokenType::PlusPlus, &OPERATORS[&OpName::PrefixIncrement]);
    map.insert(TokenType::KeywordTypeof, &OPERATORS[&OpName::Typeof]);
    map.insert(TokenType::Hyphen, &OPERATORS[&OpName::UnaryNegation]);
    map.insert(TokenType::Plus, &OPERATORS[&OpName::UnaryPlus]);
    map.insert(TokenType::KeywordVoid, &OPERATORS[&OpName::Void]);
    map.insert(TokenType::KeywordYield, &OPERATORS[&OpName::Yield]);
    map
  };
}

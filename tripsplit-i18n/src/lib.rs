#[cfg(all(feature = "zh", feature = "en"))]
compile_error!("Cannot enable both 'zh' and 'en' features at the same time");

#[cfg(feature = "zh")]
pub mod strings {
    pub const MEMBER: &str = "成员";
    pub const PAID: &str = "已付";
    pub const OWED: &str = "应付";
    pub const NET: &str = "差额";
    pub const FROM: &str = "付款人";
    pub const TO: &str = "收款人";
    pub const AMOUNT: &str = "金额";
    pub const CATEGORY: &str = "类别";
    pub const SHARE: &str = "占比";
    pub const TOTAL_SPENT: &str = "总支出";
    pub const EXPENSE_COUNT: &str = "账单数";
    pub const PER_PERSON: &str = "人均";
    pub const ALL_SETTLED: &str = "所有账目已结清";
    pub const SETTLEMENT_CALCULATION_FAILED: &str = "结算计算失败";

    pub const TRANSPORT: &str = "交通";
    pub const ACCOMMODATION: &str = "住宿";
    pub const FOOD: &str = "餐饮";
    pub const SHOPPING: &str = "购物";
    pub const TICKETS: &str = "门票";
    pub const ENTERTAINMENT: &str = "娱乐";
    pub const OTHER: &str = "其他";
}

#[cfg(feature = "en")]
pub mod strings {
    pub const MEMBER: &str = "Member";
    pub const PAID: &str = "Paid";
    pub const OWED: &str = "Owed";
    pub const NET: &str = "Net";
    pub const FROM: &str = "From";
    pub const TO: &str = "To";
    pub const AMOUNT: &str = "Amount";
    pub const CATEGORY: &str = "Category";
    pub const SHARE: &str = "Share";
    pub const TOTAL_SPENT: &str = "Total spent";
    pub const EXPENSE_COUNT: &str = "Expenses";
    pub const PER_PERSON: &str = "Per person";
    pub const ALL_SETTLED: &str = "All balances are settled";
    pub const SETTLEMENT_CALCULATION_FAILED: &str = "Settlement calculation failed";

    pub const TRANSPORT: &str = "Transport";
    pub const ACCOMMODATION: &str = "Accommodation";
    pub const FOOD: &str = "Food";
    pub const SHOPPING: &str = "Shopping";
    pub const TICKETS: &str = "Tickets";
    pub const ENTERTAINMENT: &str = "Entertainment";
    pub const OTHER: &str = "Other";
}

#[cfg(not(any(feature = "zh", feature = "en")))]
pub mod strings {
    pub const MEMBER: &str = "Member";
    pub const PAID: &str = "Paid";
    pub const OWED: &str = "Owed";
    pub const NET: &str = "Net";
    pub const FROM: &str = "From";
    pub const TO: &str = "To";
    pub const AMOUNT: &str = "Amount";
    pub const CATEGORY: &str = "Category";
    pub const SHARE: &str = "Share";
    pub const TOTAL_SPENT: &str = "Total spent";
    pub const EXPENSE_COUNT: &str = "Expenses";
    pub const PER_PERSON: &str = "Per person";
    pub const ALL_SETTLED: &str = "All balances are settled";
    pub const SETTLEMENT_CALCULATION_FAILED: &str = "Settlement calculation failed";

    pub const TRANSPORT: &str = "Transport";
    pub const ACCOMMODATION: &str = "Accommodation";
    pub const FOOD: &str = "Food";
    pub const SHOPPING: &str = "Shopping";
    pub const TICKETS: &str = "Tickets";
    pub const ENTERTAINMENT: &str = "Entertainment";
    pub const OTHER: &str = "Other";
}

pub use strings::*;

#[cfg(feature = "zh")]
pub fn empty_description() -> &'static str {
    "请填写账单描述"
}

#[cfg(feature = "zh")]
pub fn duplicate_member(name: impl std::fmt::Display) -> String {
    format!("成员 '{name}' 重复")
}

#[cfg(feature = "zh")]
pub fn duplicate_expense(id: impl std::fmt::Display) -> String {
    format!("账单编号 '{id}' 重复")
}

#[cfg(feature = "zh")]
pub fn invalid_field(field: &str, detail: &str) -> String {
    format!("字段 `{field}` 无效: {detail}")
}

#[cfg(feature = "en")]
pub fn empty_description() -> &'static str {
    "Description must not be empty"
}

#[cfg(not(any(feature = "zh", feature = "en")))]
pub fn empty_description() -> &'static str {
    "Description must not be empty"
}

#[cfg(feature = "en")]
pub fn duplicate_member(name: impl std::fmt::Display) -> String {
    format!("Member '{name}' is declared more than once")
}

#[cfg(not(any(feature = "zh", feature = "en")))]
pub fn duplicate_member(name: impl std::fmt::Display) -> String {
    format!("Member '{name}' is declared more than once")
}

#[cfg(feature = "en")]
pub fn duplicate_expense(id: impl std::fmt::Display) -> String {
    format!("Expense id '{id}' is used more than once")
}

#[cfg(not(any(feature = "zh", feature = "en")))]
pub fn duplicate_expense(id: impl std::fmt::Display) -> String {
    format!("Expense id '{id}' is used more than once")
}

#[cfg(feature = "en")]
pub fn invalid_field(field: &str, detail: &str) -> String {
    format!("Invalid `{field}`: {detail}")
}

#[cfg(not(any(feature = "zh", feature = "en")))]
pub fn invalid_field(field: &str, detail: &str) -> String {
    format!("Invalid `{field}`: {detail}")
}

pub struct SyntaxErrorMessage {
    line: usize,
    column: usize,
    detail: String,
}

pub struct ExpenseRejectedMessage {
    index: usize,
    id: String,
    reason: String,
}

pub fn syntax_error(line: usize, column: usize, detail: String) -> SyntaxErrorMessage {
    SyntaxErrorMessage {
        line,
        column,
        detail,
    }
}

/// `index` is zero-based; messages show it one-based.
pub fn expense_rejected(index: usize, id: String, reason: String) -> ExpenseRejectedMessage {
    ExpenseRejectedMessage { index, id, reason }
}

#[cfg(feature = "zh")]
impl std::fmt::Display for SyntaxErrorMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "语法错误 (第 {} 行, 第 {} 列): {}",
            self.line, self.column, self.detail
        )
    }
}

#[cfg(feature = "zh")]
impl std::fmt::Display for ExpenseRejectedMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "第 {} 笔账单 ({}) 无法记录: {}",
            self.index + 1,
            self.id,
            self.reason
        )
    }
}

#[cfg(feature = "en")]
impl std::fmt::Display for SyntaxErrorMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Syntax error at line {}, column {}: {}",
            self.line, self.column, self.detail
        )
    }
}

#[cfg(not(any(feature = "zh", feature = "en")))]
impl std::fmt::Display for SyntaxErrorMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Syntax error at line {}, column {}: {}",
            self.line, self.column, self.detail
        )
    }
}

#[cfg(feature = "en")]
impl std::fmt::Display for ExpenseRejectedMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Expense #{} ({}) was rejected: {}",
            self.index + 1,
            self.id,
            self.reason
        )
    }
}

#[cfg(not(any(feature = "zh", feature = "en")))]
impl std::fmt::Display for ExpenseRejectedMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Expense #{} ({}) was rejected: {}",
            self.index + 1,
            self.id,
            self.reason
        )
    }
}

//! 库存表格的列布局，以及行与记录之间的转换

use super::model::{NewProduct, Product};

pub const COL_COMPANY: usize = 0;
pub const COL_NAME: usize = 1;
pub const COL_ALIAS: usize = 2;
pub const COL_QUANTITY: usize = 3;
pub const COL_RACK: usize = 4;
pub const COL_LEVEL: usize = 5;
pub const COL_NOTES: usize = 6;
pub const COL_PHOTO_URL: usize = 7;
pub const COL_DATE_ADDED: usize = 8;
pub const COL_ADDED_BY: usize = 9;
/// 预留给风险评分
pub const COL_RISK_SCORE: usize = 10;
/// 预留给补货建议
pub const COL_REORDER_SUGGESTION: usize = 11;

/// 写入时每行固定 26 列（A..Z）
pub const ROW_WIDTH: usize = 26;

/// 表头所在行，数据从下一行开始
pub const HEADER_ROW: u32 = 1;

const HEADER: [&str; 12] = [
    "Company",
    "Item Name",
    "Alias",
    "Quantity",
    "Rack",
    "Level",
    "Notes",
    "Photo URL",
    "Date Added",
    "Added By",
    "Risk Score",
    "Reorder Suggestion",
];

/// 新建表格时使用的表头行
pub fn header_row() -> Vec<String> {
    let mut row: Vec<String> = HEADER.iter().map(|h| h.to_string()).collect();
    row.resize(ROW_WIDTH, String::new());
    row
}

/// 解析数量，非纯数字或溢出时按 0 处理
pub fn parse_quantity(raw: &str) -> u32 {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    trimmed.parse().unwrap_or(0)
}

/// 货架与层号合成位置，任一为空时只保留另一个
pub fn join_location(rack: &str, level: &str) -> String {
    match (rack.trim(), level.trim()) {
        ("", "") => String::new(),
        (rack, "") => rack.to_string(),
        ("", level) => level.to_string(),
        (rack, level) => format!("{}-{}", rack, level),
    }
}

/// 按第一个 `-` 拆分位置为货架和层号
pub fn split_location(location: &str) -> (String, String) {
    match location.trim().split_once('-') {
        Some((rack, level)) => (rack.trim().to_string(), level.trim().to_string()),
        None => (location.trim().to_string(), String::new()),
    }
}

/// 把一行转换为库存记录，公司或名称为空时返回 `None`
pub fn product_from_row(row_id: u32, row: &[String]) -> Option<Product> {
    let cell = |index: usize| row.get(index).map(|s| s.trim()).unwrap_or("");

    let company = cell(COL_COMPANY);
    let name = cell(COL_NAME);
    if company.is_empty() || name.is_empty() {
        return None;
    }

    Some(Product {
        id: row_id,
        company: company.to_string(),
        name: name.to_string(),
        alias: cell(COL_ALIAS).to_string(),
        quantity: parse_quantity(cell(COL_QUANTITY)),
        location: join_location(cell(COL_RACK), cell(COL_LEVEL)),
        notes: cell(COL_NOTES).to_string(),
        photo_url: cell(COL_PHOTO_URL).to_string(),
        date_added: cell(COL_DATE_ADDED).to_string(),
        added_by: cell(COL_ADDED_BY).to_string(),
    })
}

/// 跳过表头，把所有数据行转换为记录
pub fn parse_rows(rows: &[Vec<String>]) -> Vec<Product> {
    rows.iter()
        .enumerate()
        .skip(HEADER_ROW as usize)
        .filter_map(|(index, row)| product_from_row(index as u32 + 1, row))
        .collect()
}

/// 把新记录序列化为固定宽度的行
pub fn row_from_new_product(product: &NewProduct) -> Vec<String> {
    let mut row = vec![String::new(); ROW_WIDTH];
    let (rack, level) = split_location(&product.location);

    row[COL_COMPANY] = product.company.clone();
    row[COL_NAME] = product.name.clone();
    row[COL_ALIAS] = product.alias.clone();
    row[COL_QUANTITY] = product.quantity.to_string();
    row[COL_RACK] = rack;
    row[COL_LEVEL] = level;
    row[COL_NOTES] = product.notes.clone();
    row[COL_PHOTO_URL] = product.photo_url.clone();
    row[COL_DATE_ADDED] = product.date_added.clone();
    row[COL_ADDED_BY] = product.added_by.clone();
    // COL_RISK_SCORE / COL_REORDER_SUGGESTION 暂时留空
    row
}

//! 内存中的搜索与公司筛选

use std::collections::BTreeMap;

use super::model::Product;

/// 名称、别名、公司任一包含搜索词（不区分大小写）即命中
///
/// 空白搜索词返回全部记录，顺序不变；非空搜索词按原样匹配，不去除首尾空格。
pub fn search_products(products: Vec<Product>, term: &str) -> Vec<Product> {
    if term.trim().is_empty() {
        return products;
    }
    let term = term.to_lowercase();

    products
        .into_iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&term)
                || p.alias.to_lowercase().contains(&term)
                || p.company.to_lowercase().contains(&term)
        })
        .collect()
}

/// 用别名表把公司简称换成全称，未登记的原样返回
pub fn normalize_company(company: &str, aliases: &BTreeMap<String, String>) -> String {
    let company = company.trim();
    aliases
        .iter()
        .find(|(alias, _)| alias.trim().to_lowercase() == company.to_lowercase())
        .map(|(_, full)| full.clone())
        .unwrap_or_else(|| company.to_string())
}

/// 判断公司参数是否表示“全部”
pub fn is_all_companies(company: &str) -> bool {
    let company = company.trim();
    company.is_empty() || company.eq_ignore_ascii_case("all")
}

/// 按公司精确筛选（不区分大小写）
pub fn filter_by_company(
    products: Vec<Product>,
    company: &str,
    aliases: &BTreeMap<String, String>,
) -> Vec<Product> {
    if is_all_companies(company) {
        return products;
    }

    let wanted = normalize_company(company, aliases).to_lowercase();
    products
        .into_iter()
        .filter(|p| p.company.to_lowercase() == wanted)
        .collect()
}

/// Spending or income category offered by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub value: String,
}

/// Transaction type option (the backend names them "Income" / "Expense").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionType {
    pub id: String,
    pub value: String,
}

/// Resolves a user supplied type by id or by case-insensitive name.
pub fn find_type<'a>(types: &'a [TransactionType], needle: &str) -> Option<&'a TransactionType> {
    let needle = needle.trim();
    types.iter().find(|item| item.id == needle).or_else(|| {
        types
            .iter()
            .find(|item| item.value.eq_ignore_ascii_case(needle))
    })
}

/// Resolves a user supplied category by id or by case-insensitive name.
pub fn find_category<'a>(categories: &'a [Category], needle: &str) -> Option<&'a Category> {
    let needle = needle.trim();
    categories
        .iter()
        .find(|item| item.id == needle)
        .or_else(|| {
            categories
                .iter()
                .find(|item| item.value.eq_ignore_ascii_case(needle))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types() -> Vec<TransactionType> {
        vec![
            TransactionType {
                id: "1".to_owned(),
                value: "Income".to_owned(),
            },
            TransactionType {
                id: "2".to_owned(),
                value: "Expense".to_owned(),
            },
        ]
    }

    #[test]
    fn finds_type_by_id_or_name() {
        let types = types();

        assert_eq!(find_type(&types, "2").map(|t| t.value.as_str()), Some("Expense"));
        assert_eq!(find_type(&types, "income").map(|t| t.id.as_str()), Some("1"));
        assert!(find_type(&types, "transfer").is_none());
    }

    #[test]
    fn finds_category_by_name() {
        let categories = vec![Category {
            id: "10".to_owned(),
            value: "Food".to_owned(),
        }];

        assert_eq!(
            find_category(&categories, "food").map(|c| c.id.as_str()),
            Some("10")
        );
    }
}

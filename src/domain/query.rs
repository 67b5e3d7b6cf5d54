/// Filter, sort and pagination parameters shared by the order and customer
/// list operations.
///
/// `sort_by` accepts the same keys the API documents: "firstname",
/// "secondname"/"name", "customernumber"/"number", "date"/"time"; anything
/// else falls back to creation date.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub customer_number: Option<i32>,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub sort_by: Option<String>,
    pub is_descending: bool,
    pub page_number: i64,
    pub page_size: i64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            customer_number: None,
            first_name: None,
            second_name: None,
            sort_by: None,
            is_descending: false,
            page_number: 1,
            page_size: 10,
        }
    }
}

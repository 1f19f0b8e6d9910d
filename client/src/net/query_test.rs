use super::*;

fn pairs(query: &Query) -> Vec<(&str, &str)> {
    query.params().iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

#[test]
fn builds_select_filter_and_order_pairs() {
    let query = Query::table("stages").select("*").eq("course_id", "c-1").order("position", true);

    assert_eq!(query.table_name(), "stages");
    assert_eq!(pairs(&query), vec![("select", "*"), ("course_id", "eq.c-1"), ("order", "position.asc")]);
    assert!(!query.is_single());
}

#[test]
fn order_descending() {
    let query = Query::table("quiz_attempts").order("created_at", false);
    assert_eq!(pairs(&query), vec![("order", "created_at.desc")]);
}

#[test]
fn select_replaces_previous_columns() {
    let query = Query::table("profiles").select("*").select("id,full_name");
    assert_eq!(pairs(&query), vec![("select", "id,full_name")]);
}

#[test]
fn eq_formats_non_string_values() {
    let query = Query::table("questions").eq("position", 3).eq("active", true);
    assert_eq!(pairs(&query), vec![("position", "eq.3"), ("active", "eq.true")]);
}

#[test]
fn single_is_recorded() {
    assert!(Query::table("courses").eq("slug", "rust").single().is_single());
}

#[test]
fn filters_drop_select_and_order() {
    let query = Query::table("profiles").select("*").eq("id", "u-1").order("id", true);
    assert_eq!(query.filters(), vec![("id".to_owned(), "eq.u-1".to_owned())]);
}

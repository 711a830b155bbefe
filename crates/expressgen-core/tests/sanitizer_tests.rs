use expressgen_core::transform::{
    NameSanitizer, escape_quotation_mark, remove_non_name_element_to_camel_case, to_api_filename,
};

#[test]
fn test_operation_id_with_hyphens() {
    assert_eq!(
        remove_non_name_element_to_camel_case("add-pet-to-store"),
        "addPetToStore"
    );
}

#[test]
fn test_pascal_operation_id_is_lowered() {
    assert_eq!(remove_non_name_element_to_camel_case("ListPets"), "listPets");
}

#[test]
fn test_reserved_word_class() {
    let sanitizer = NameSanitizer::default();
    assert_eq!(sanitizer.escape_reserved_word("class"), "_class");
}

#[test]
fn test_reserved_parameter_name() {
    let sanitizer = NameSanitizer::default();
    assert_eq!(sanitizer.sanitize("default"), "_default");
    assert_eq!(sanitizer.sanitize("x-request-id"), "xRequestId");
}

#[test]
fn test_quotes_only() {
    assert_eq!(escape_quotation_mark(r#"He said "hi""#), r#"He said \"hi\""#);
    assert_eq!(escape_quotation_mark(r"C:\path 'x'"), r"C:\path 'x'");
}

#[test]
fn test_tag_file_names() {
    assert_eq!(to_api_filename("store"), "StoreApi");
    assert_eq!(to_api_filename("user_accounts"), "UserAccountsApi");
}

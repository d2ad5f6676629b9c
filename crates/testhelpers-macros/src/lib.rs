//! Macros that generate a `#[test]` function for every type or object that a
//! test handler should be run with. This is the compile time counterpart of
//! the `testhelpers` generator: every generated function is discovered by the
//! test harness as a test of its own.
use std::collections::HashSet;

use convert_case::{Case, Casing};
use itertools::Itertools;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote, ToTokens};
use syn::{
    bracketed,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
    Expr, Ident, LitStr, Path, Token, Type,
};

/// Parameter inputs to the test generating macros, `T` is the kind of item
/// that the tests are parameterised by.
struct CreateTestsInput<T> {
    /// prefix to use for when generating each test case.
    prefix: LitStr,
    /// What is the function that handles each test case.
    func: Path,
    /// The items to create a test for.
    items: Punctuated<T, Token![,]>,
    /// The latest variant of the items, if only the latest should be tested
    /// when `TEST_LATEST_ONLY` is set.
    latest: Option<T>,
}

impl<T: Parse> Parse for CreateTestsInput<T> {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let prefix = input.parse()?;
        input.parse::<Token![,]>()?;
        let func = input.parse()?;
        input.parse::<Token![,]>()?;

        let content;
        bracketed!(content in input);
        let items = Punctuated::parse_terminated(&content)?;

        let mut latest = None;
        if input.parse::<Option<Token![,]>>()?.is_some() && !input.is_empty() {
            let key: Ident = input.parse()?;
            if key != "latest" {
                return Err(syn::Error::new(key.span(), "expected `latest = <item>`"));
            }
            input.parse::<Token![=]>()?;
            latest = Some(input.parse()?);
            input.parse::<Option<Token![,]>>()?;
        }

        if !input.is_empty() {
            return Err(input.error("unexpected tokens after the macro arguments"));
        }

        Ok(CreateTestsInput { prefix, func, items, latest })
    }
}

/// Convert the tokens of an item into the snake case name of a test, i.e.
/// `Vec<String>` becomes `vec_string` and `"hello world"` becomes
/// `hello_world`.
fn snake_name(item: &str) -> String {
    item.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(|word| word.to_case(Case::Snake))
        .join("_")
}

/// Create the name of the test for the item at `index`, falling back to the
/// index when the item has no characters that can be used within a name.
fn test_name(prefix: &str, item: &str, index: usize) -> String {
    let mut snake = snake_name(item);
    if snake.is_empty() {
        snake = format!("item_{index}");
    }

    if prefix.is_empty() { format!("test_{snake}") } else { format!("{prefix}_test_{snake}") }
}

/// Expand each item into a test function, `body` produces the body of the
/// test from the item and whether the item should be skipped when only the
/// latest variant is tested.
fn create_tests<T: ToTokens>(
    input: &CreateTestsInput<T>,
    mut body: impl FnMut(&T, bool) -> TokenStream2,
) -> syn::Result<TokenStream2> {
    let prefix = input.prefix.value();
    if prefix.starts_with(|ch: char| ch.is_ascii_digit())
        || !prefix.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    {
        return Err(syn::Error::new_spanned(
            &input.prefix,
            "the prefix must only contain alphanumeric characters and underscores",
        ));
    }

    let latest = input.latest.as_ref().map(|latest| latest.to_token_stream().to_string());

    if let (Some(latest_item), Some(latest)) = (&input.latest, &latest) {
        if !input.items.iter().any(|item| item.to_token_stream().to_string() == *latest) {
            return Err(syn::Error::new_spanned(
                latest_item,
                "the latest item is not one of the items",
            ));
        }
    }

    let mut names = HashSet::new();
    let mut tests = vec![];

    for (index, item) in input.items.iter().enumerate() {
        let tokens = item.to_token_stream().to_string();
        let name = test_name(&prefix, &tokens, index);

        if !names.insert(name.clone()) {
            return Err(syn::Error::new_spanned(
                item,
                format!("the test name `{name}` is generated for more than one item"),
            ));
        }

        let skippable = latest.as_ref().is_some_and(|latest| *latest != tokens);
        let name = format_ident!("{}", name);
        let test_body = body(item, skippable);

        tests.push(quote! {
            #[test]
            fn #name() -> ::testhelpers::TestResult {
                #test_body
            }
        });
    }

    Ok(quote! { #(#tests)* })
}

fn skip_unless_latest(skippable: bool) -> TokenStream2 {
    if skippable {
        quote! {
            if ::testhelpers::variants::latest_only() {
                return Ok(());
            }
        }
    } else {
        quote! {}
    }
}

/// Generate a test for each of the given types.
///
/// The format of this macro is as follows:
/// ```ignore
/// create_tests_using_types!(PREFIX, TEST_FN, [TYPE, ...]);
/// create_tests_using_types!(PREFIX, TEST_FN, [TYPE, ...], latest = TYPE);
/// ```
///
/// - `PREFIX` is a string literal that is prepended to the name of each test,
///   so that the macro can be used more than once within a module. For the
///   type `Vec<String>` and the prefix `store`, the test `store_test_vec_string`
///   is generated. An empty prefix generates `test_vec_string`.
///
/// - `TEST_FN` must be a path to a generic function `fn<T>() -> TestResult`.
///   Every generated test invokes it as `TEST_FN::<TYPE>()`.
///
/// - If `latest` is specified, then every other type returns early when the
///   `TEST_LATEST_ONLY` environment variable is `1`.
#[proc_macro]
pub fn create_tests_using_types(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as CreateTestsInput<Type>);
    let func = &input.func;

    create_tests(&input, |ty, skippable| {
        let skip = skip_unless_latest(skippable);
        quote! {
            #skip
            #func::<#ty>()
        }
    })
    .unwrap_or_else(syn::Error::into_compile_error)
    .into()
}

/// Generate a test for each of the given objects.
///
/// The format of this macro is as follows:
/// ```ignore
/// create_tests_using_objects!(PREFIX, TEST_FN, [EXPR, ...]);
/// ```
///
/// The name of each test is derived from the tokens of the expression, i.e.
/// the object `"a b"` with prefix `parse` generates `parse_test_a_b`.
/// `TEST_FN` must be a path to a function that takes the object and returns a
/// `TestResult`. Every generated test invokes it as `TEST_FN(EXPR)`. The
/// `latest = EXPR` argument is accepted in the same way as for
/// [create_tests_using_types!].
#[proc_macro]
pub fn create_tests_using_objects(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as CreateTestsInput<Expr>);
    let func = &input.func;

    create_tests(&input, |object, skippable| {
        let skip = skip_unless_latest(skippable);
        quote! {
            #skip
            #func(#object)
        }
    })
    .unwrap_or_else(syn::Error::into_compile_error)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_names_from_type_tokens() {
        assert_eq!(snake_name("String"), "string");
        assert_eq!(snake_name("OldParser"), "old_parser");
        assert_eq!(snake_name("Vec < String >"), "vec_string");
        assert_eq!(snake_name("\"hello world\""), "hello_world");
        assert_eq!(snake_name("()"), "");
    }

    #[test]
    fn test_names_use_the_prefix() {
        assert_eq!(test_name("store", "OldStore", 0), "store_test_old_store");
        assert_eq!(test_name("", "OldStore", 0), "test_old_store");
        assert_eq!(test_name("unit", "()", 3), "unit_test_item_3");
    }

    #[test]
    fn parses_types_with_latest() {
        let input: CreateTestsInput<Type> =
            syn::parse_str(r#""store", check_store, [OldStore, NewStore], latest = NewStore"#)
                .unwrap();

        assert_eq!(input.prefix.value(), "store");
        assert_eq!(input.items.len(), 2);
        assert_eq!(input.latest.unwrap().to_token_stream().to_string(), "NewStore");
    }

    #[test]
    fn parses_objects_without_latest() {
        let input: CreateTestsInput<Expr> =
            syn::parse_str(r#""parse", suite::check, ["a", "b", 3,]"#).unwrap();

        assert_eq!(input.func.to_token_stream().to_string(), "suite :: check");
        assert_eq!(input.items.len(), 3);
        assert!(input.latest.is_none());
    }

    #[test]
    fn rejects_unknown_keys() {
        let result: syn::Result<CreateTestsInput<Type>> =
            syn::parse_str(r#""store", check, [A, B], newest = B"#);

        assert!(result.is_err());
    }

    #[test]
    fn duplicate_names_are_an_error() {
        let input: CreateTestsInput<Expr> =
            syn::parse_str(r#""parse", check, ["a b", "a-b"]"#).unwrap();

        let error = create_tests(&input, |_, _| quote! {}).unwrap_err();
        assert_eq!(
            error.to_string(),
            "the test name `parse_test_a_b` is generated for more than one item"
        );
    }

    #[test]
    fn only_non_latest_items_are_skippable() {
        let input: CreateTestsInput<Type> =
            syn::parse_str(r#""store", check, [OldStore, NewStore], latest = NewStore"#).unwrap();

        let mut skippable = vec![];
        create_tests(&input, |ty, skip| {
            skippable.push((ty.to_token_stream().to_string(), skip));
            quote! {}
        })
        .unwrap();

        assert_eq!(skippable, [("OldStore".to_owned(), true), ("NewStore".to_owned(), false)]);
    }

    #[test]
    fn latest_must_be_one_of_the_items() {
        let input: CreateTestsInput<Type> =
            syn::parse_str(r#""store", check, [OldStore], latest = NewStore"#).unwrap();

        assert!(create_tests(&input, |_, _| quote! {}).is_err());
    }

    #[test]
    fn prefix_must_form_an_identifier() {
        for prefix in ["my-store", "1store", "store tests"] {
            let input: CreateTestsInput<Type> =
                syn::parse_str(&format!(r#""{prefix}", check, [OldStore]"#)).unwrap();

            assert!(create_tests(&input, |_, _| quote! {}).is_err(), "{prefix}");
        }
    }
}

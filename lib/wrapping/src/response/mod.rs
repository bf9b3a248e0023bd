pub mod graphql_error;

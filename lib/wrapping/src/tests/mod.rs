mod wrap_query;

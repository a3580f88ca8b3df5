diesel::table! {
    products (product_id) {
        product_id -> Integer,
        name -> Text,
        description -> Text,
        price -> Text,
        category -> Text,
    }
}

diesel::table! {
    orders (order_id) {
        order_id -> Integer,
        name -> Text,
        line1 -> Text,
        line2 -> Nullable<Text>,
        line3 -> Nullable<Text>,
        city -> Text,
        state -> Text,
        zip -> Nullable<Text>,
        country -> Text,
        gift_wrap -> Bool,
        shipped -> Bool,
    }
}

diesel::table! {
    order_lines (order_line_id) {
        order_line_id -> Integer,
        order_id -> Integer,
        product_id -> Integer,
        quantity -> Integer,
    }
}

diesel::joinable!(order_lines -> orders (order_id));
diesel::joinable!(order_lines -> products (product_id));

diesel::allow_tables_to_appear_in_same_query!(orders, order_lines, products,);

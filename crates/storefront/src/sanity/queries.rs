//! GROQ query definitions.
//!
//! Parameters are referenced as `$name` and sent JSON-encoded as `$name`
//! query-string pairs.

/// Fields projected for every product.
macro_rules! product_projection {
    () => {
        r#"{
  _id,
  name,
  description,
  price,
  discountPercentage,
  priceWithoutDiscount,
  rating,
  ratingCount,
  tags,
  sizes,
  "image": image.asset->url
}"#
    };
}

/// Every product in the catalog.
pub const ALL_PRODUCTS: &str = concat!(r#"*[_type == "product"] | order(name asc) "#, product_projection!());

/// A single product by document ID. Takes `$id`.
pub const PRODUCT_BY_ID: &str =
    concat!(r#"*[_type == "product" && _id == $id] "#, product_projection!());

/// Recorded orders with their cart items dereferenced.
pub const ALL_ORDERS: &str = r#"*[_type == "order"] | order(createdAt desc) {
  _id,
  name,
  email,
  address,
  createdAt,
  cartItems[]->{
    _id,
    name,
    price,
    quantity
  }
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_queries_share_projection() {
        assert!(ALL_PRODUCTS.contains(r#""image": image.asset->url"#));
        assert!(PRODUCT_BY_ID.contains("_id == $id"));
        assert!(PRODUCT_BY_ID.ends_with(ALL_PRODUCTS.split_once("asc) ").map_or("", |(_, p)| p)));
    }

    #[test]
    fn test_orders_dereference_items() {
        assert!(ALL_ORDERS.contains("cartItems[]->"));
    }
}

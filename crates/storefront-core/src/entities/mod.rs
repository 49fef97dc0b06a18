//! Domain entities

mod order;
mod page;
mod product;
mod review;
mod user;

pub use order::{Order, OrderItem, OrderStatus};
pub use page::Paginated;
pub use product::{Favorite, Product, ProductQuery, ProductSort};
pub use review::Review;
pub use user::{Role, UserInfo};

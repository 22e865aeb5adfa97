pub mod page_view;
pub mod total_views;
pub mod visitor;

pub use page_view::Entity as PageViewEntity;
pub use total_views::Entity as TotalViewsEntity;
pub use visitor::Entity as VisitorEntity;

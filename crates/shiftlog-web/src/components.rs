mod notification_list;

pub use notification_list::{
  ListVariant,
  NotificationList,
  NotificationListProps
};

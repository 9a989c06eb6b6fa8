//! Panel stack navigation.

mod panels;
mod scroll_cache;
mod swipe;

pub use panels::{
    PanelRender, TransitionInfo, View, ViewConfig, ViewEvent, ViewRender, TRANSITION_END_EVENT,
    TRANSITION_START_EVENT,
};
pub use scroll_cache::{ScrollCache, Scrolls};
pub use swipe::{
    is_browser_swipe, starts_at_edge, PanelSwipeStyle, SwipeBackResult, SwipeRelease,
    ViewSwipeNavigator, SWIPE_BACK_COMMIT_SPEED, SWIPE_BACK_SHADOW_ALPHA,
};

#[cfg(test)]
#[path = "../tests/swipe_tests.rs"]
mod swipe_tests;

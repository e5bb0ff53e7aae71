use crate::display::Screen;
use crate::mpris::MprisHandle;

/// Push `screen` to MPRIS when it differs from what was last published.
///
/// Elapsed time alone does not count as a change; MPRIS clients track the
/// position themselves.
pub fn update_mpris(mpris: &MprisHandle, screen: &Screen, last: &mut Option<Screen>) {
    if last.as_ref().is_some_and(|prev| same_track(prev, screen)) {
        return;
    }
    mpris.publish(screen);
    *last = Some(screen.clone());
}

fn same_track(a: &Screen, b: &Screen) -> bool {
    match (a, b) {
        (Screen::Playing(x), Screen::Playing(y)) => x.index == y.index && x.name == y.name,
        (Screen::Playing(_), _) | (_, Screen::Playing(_)) => false,
        _ => true,
    }
}

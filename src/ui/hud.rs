use crate::core::session::Snapshot;
use crate::systems::hud::HudView;
use crate::ui::clock_face::ClockFace;

/// Text rendering of the HUD for the console driver.
pub fn render_hud(snapshot: &Snapshot) -> String {
    let mut output = String::new();
    output.push_str(&format!("[{}] {}\n", ClockFace::from_time(snapshot.time), snapshot.status));

    match snapshot.view {
        HudView::Controls => {
            for modality in &snapshot.modalities {
                let marker = if snapshot.active == Some(modality.kind) { '*' } else { ' ' };
                let availability = match &modality.blocked {
                    Some(reason) => format!("blocked: {}", reason),
                    None => "available".to_string(),
                };
                output.push_str(&format!(
                    " {} {:<10} count {:>3}  {}\n",
                    marker, modality.kind, modality.counter, availability
                ));
            }
        }
        HudView::Credits => {
            output.push_str("=== The weekend is over ===\n");
            output.push_str("Thanks for playing.\n");
        }
    }

    output
}

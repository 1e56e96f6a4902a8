//! Drawables for one frame
//!
//! The scene is plain data rebuilt from the session every frame. Shapes are
//! tessellated by `shapes`; text labels are mirrored into the DOM overlay.

use glam::Vec2;

use super::vertex::colors;
use crate::sim::{GamePhase, ObjectKind};
use crate::ui::{Button, Session};

pub type Color = [f32; 4];

/// Centered outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

/// Overlay elements, one DOM node each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelId {
    Title,
    InstructionGood,
    InstructionBad,
    Controls,
    Score,
    GameOver,
    ButtonCaption,
    Fps,
}

impl LabelId {
    pub const ALL: [LabelId; 8] = [
        LabelId::Title,
        LabelId::InstructionGood,
        LabelId::InstructionBad,
        LabelId::Controls,
        LabelId::Score,
        LabelId::GameOver,
        LabelId::ButtonCaption,
        LabelId::Fps,
    ];

    pub fn dom_id(&self) -> &'static str {
        match self {
            LabelId::Title => "label-title",
            LabelId::InstructionGood => "label-good",
            LabelId::InstructionBad => "label-bad",
            LabelId::Controls => "label-controls",
            LabelId::Score => "label-score",
            LabelId::GameOver => "label-game-over",
            LabelId::ButtonCaption => "label-button",
            LabelId::Fps => "label-fps",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub id: LabelId,
    pub text: String,
    /// Center of the text in playfield coordinates
    pub position: Vec2,
    /// Font size in playfield pixels
    pub size: f32,
    pub color: Color,
    pub bold: bool,
}

/// Everything the render surface knows how to draw
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Rect {
        center: Vec2,
        size: Vec2,
        fill: Color,
        stroke: Option<Stroke>,
    },
    RoundedRect {
        center: Vec2,
        size: Vec2,
        radius: f32,
        fill: Color,
        stroke: Option<Stroke>,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: Color,
        stroke: Option<Stroke>,
    },
    Text(TextLabel),
}

/// Draw list in back-to-front order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub drawables: Vec<Drawable>,
}

fn text(id: LabelId, text: impl Into<String>, position: Vec2, size: f32, color: Color, bold: bool) -> Drawable {
    Drawable::Text(TextLabel {
        id,
        text: text.into(),
        position,
        size,
        color,
        bold,
    })
}

fn button(button: &Button, fill: Color, stroke: Color) -> [Drawable; 2] {
    [
        Drawable::RoundedRect {
            center: button.center,
            size: button.size,
            radius: 10.0,
            fill,
            stroke: Some(Stroke {
                color: stroke,
                width: 3.0,
            }),
        },
        text(
            LabelId::ButtonCaption,
            button.label,
            button.center,
            28.0,
            colors::TEXT_ON_BUTTON,
            true,
        ),
    ]
}

/// One of the bad object looks: square, rounded, pill-cornered or dark
fn bad_object(center: Vec2, size: f32, variant: u8) -> Drawable {
    let size = Vec2::splat(size);
    let stroke = Some(Stroke {
        color: colors::BAD_STROKE,
        width: 2.0,
    });
    match variant {
        0 => Drawable::Rect {
            center,
            size,
            fill: colors::BAD,
            stroke,
        },
        1 => Drawable::RoundedRect {
            center,
            size,
            radius: 12.0,
            fill: colors::BAD,
            stroke,
        },
        2 => Drawable::RoundedRect {
            center,
            size,
            radius: 28.0,
            fill: colors::BAD,
            stroke,
        },
        _ => Drawable::RoundedRect {
            center,
            size,
            radius: 12.0,
            fill: colors::BAD_DARK,
            stroke,
        },
    }
}

impl Scene {
    /// Lay out the frame for the session's current phase
    pub fn build(session: &Session) -> Self {
        let state = &session.state;
        let tuning = &state.tuning;
        let mid_x = tuning.screen_width / 2.0;
        let mid_y = tuning.screen_height / 2.0;
        let mut drawables = Vec::with_capacity(state.objects.len() + 8);

        // Falling objects
        for obj in &state.objects {
            let center = Vec2::new(obj.x, obj.y);
            drawables.push(match obj.kind {
                ObjectKind::Good => Drawable::Circle {
                    center,
                    radius: tuning.object_size / 2.0,
                    fill: colors::GOOD,
                    stroke: Some(Stroke {
                        color: colors::GOOD_STROKE,
                        width: 2.0,
                    }),
                },
                ObjectKind::Bad => bad_object(center, tuning.object_size, obj.variant),
            });
        }

        // Player
        drawables.push(Drawable::RoundedRect {
            center: Vec2::new(state.player.x, tuning.player_y()),
            size: Vec2::splat(tuning.player_size),
            radius: 8.0,
            fill: colors::PLAYER,
            stroke: Some(Stroke {
                color: colors::PLAYER_STROKE,
                width: 2.0,
            }),
        });

        match state.phase {
            GamePhase::Idle => {
                drawables.push(text(
                    LabelId::Title,
                    "FALL DODGE",
                    Vec2::new(mid_x, mid_y - 150.0),
                    56.0,
                    colors::TEXT,
                    true,
                ));
                drawables.push(text(
                    LabelId::InstructionGood,
                    "Green = Collect",
                    Vec2::new(mid_x, mid_y - 50.0),
                    24.0,
                    colors::GOOD,
                    false,
                ));
                drawables.push(text(
                    LabelId::InstructionBad,
                    "Red = Avoid",
                    Vec2::new(mid_x, mid_y - 10.0),
                    24.0,
                    colors::BAD,
                    false,
                ));
                drawables.push(text(
                    LabelId::Controls,
                    "Use Arrow Keys or A/D to move",
                    Vec2::new(mid_x, mid_y + 40.0),
                    20.0,
                    colors::TEXT_MUTED,
                    false,
                ));
            }
            GamePhase::Running | GamePhase::Ended => {
                drawables.push(text(
                    LabelId::Score,
                    format!("Score: {}", state.score),
                    Vec2::new(mid_x, 50.0),
                    32.0,
                    colors::TEXT,
                    true,
                ));
                if state.phase == GamePhase::Ended {
                    drawables.push(text(
                        LabelId::GameOver,
                        "GAME OVER!",
                        Vec2::new(mid_x, mid_y - 50.0),
                        64.0,
                        colors::BAD,
                        true,
                    ));
                }
            }
        }

        if let Some(visible) = session.visible_button() {
            let (fill, stroke) = match state.phase {
                GamePhase::Idle => (colors::START_BUTTON, colors::START_BUTTON_STROKE),
                _ => (colors::RESTART_BUTTON, colors::RESTART_BUTTON_STROKE),
            };
            drawables.extend(button(&visible, fill, stroke));
        }

        Self { drawables }
    }

    /// Append an FPS readout in the corner
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.drawables.push(text(
            LabelId::Fps,
            format!("{} FPS", fps),
            Vec2::new(50.0, 20.0),
            16.0,
            colors::TEXT_MUTED,
            false,
        ));
        self
    }

    pub fn labels(&self) -> impl Iterator<Item = &TextLabel> {
        self.drawables.iter().filter_map(|d| match d {
            Drawable::Text(label) => Some(label),
            _ => None,
        })
    }

    pub fn label(&self, id: LabelId) -> Option<&TextLabel> {
        self.labels().find(|l| l.id == id)
    }

    /// Non-text drawables, in draw order
    pub fn shapes(&self) -> impl Iterator<Item = &Drawable> {
        self.drawables
            .iter()
            .filter(|d| !matches!(d, Drawable::Text(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn session() -> Session {
        Session::new(3, Tuning::default())
    }

    #[test]
    fn test_title_screen() {
        let scene = Scene::build(&session());
        assert!(scene.label(LabelId::Title).is_some());
        assert_eq!(scene.label(LabelId::ButtonCaption).unwrap().text, "START");
        assert!(scene.label(LabelId::Score).is_none());
        // Player and start button
        assert_eq!(scene.shapes().count(), 2);
    }

    #[test]
    fn test_running_shows_score_only() {
        let mut s = session();
        s.start();
        s.state.score = 35;
        s.state.push_object(ObjectKind::Good, 100.0);
        s.state.push_object(ObjectKind::Bad, 200.0);

        let scene = Scene::build(&s);
        assert_eq!(scene.label(LabelId::Score).unwrap().text, "Score: 35");
        assert!(scene.label(LabelId::ButtonCaption).is_none());
        assert!(scene.label(LabelId::GameOver).is_none());

        let shapes: Vec<&Drawable> = scene.shapes().collect();
        assert_eq!(shapes.len(), 3);
        assert!(matches!(shapes[0], Drawable::Circle { .. }));
        assert!(matches!(shapes[1], Drawable::Rect { .. }));
    }

    #[test]
    fn test_game_over_screen() {
        let mut s = session();
        s.start();
        s.state.phase = GamePhase::Ended;
        let scene = Scene::build(&s);
        assert!(scene.label(LabelId::GameOver).is_some());
        assert!(scene.label(LabelId::Score).is_some());
        let caption = scene.label(LabelId::ButtonCaption).unwrap();
        assert_eq!(caption.text, "RESTART");
        assert_eq!(caption.position, Vec2::new(300.0, 650.0));
    }

    #[test]
    fn test_bad_variants_look_different() {
        let mut s = session();
        s.start();
        for variant in 0..crate::sim::BAD_VARIANTS {
            s.state.push_variant(ObjectKind::Bad, 100.0, variant);
        }
        let scene = Scene::build(&s);
        let shapes: Vec<&Drawable> = scene.shapes().take(4).collect();
        assert!(matches!(shapes[0], Drawable::Rect { .. }));
        for (i, a) in shapes.iter().enumerate() {
            for b in &shapes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_fps_label() {
        let scene = Scene::build(&session()).with_fps(60);
        assert_eq!(scene.label(LabelId::Fps).unwrap().text, "60 FPS");
    }

    #[test]
    fn test_dom_ids_unique() {
        let mut ids: Vec<&str> = LabelId::ALL.iter().map(|l| l.dom_id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), LabelId::ALL.len());
    }
}

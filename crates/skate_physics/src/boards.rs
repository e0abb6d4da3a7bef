//! Board bodies
//!
//! One dynamic body per texture. Boards are keyed by their slot in the texture list and
//! the texture URL, so repeated URLs give distinct boards and changing the list only adds
//! or removes the affected boards. Walls and the drag are never touched by a sync.

use crate::backend::{BoardBody, BodyHandle, PhysicsBackend, Pose};
use crate::config::FooterConfig;
use indexmap::IndexMap;
use rand::Rng;
use skate_core::{Size, Vec2};
use tracing::debug;

/// Identity of a board: texture slot and URL
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoardKey {
    pub slot: usize,
    pub texture: String,
}

/// Textures that get a body. Narrow viewports are capped at `mobile_limit`.
pub fn visible_textures(textures: &[String], is_mobile: bool, mobile_limit: usize) -> &[String] {
    if is_mobile {
        &textures[..textures.len().min(mobile_limit)]
    } else {
        textures
    }
}

/// Random spawn pose in the upper half of the host
pub fn spawn_pose(rng: &mut impl Rng, host: Size) -> Pose {
    let x = rng.gen::<f32>() * host.width;
    let y = rng.gen::<f32>() * (host.height / 2.0 - 100.0) + 50.0;
    let degrees = rng.gen::<f32>() * 100.0 - 50.0;
    Pose::new(Vec2::new(x, y), degrees.to_radians())
}

/// A live board
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    pub handle: BodyHandle,
    pub texture: String,
}

/// Boards currently in the world, in texture order
#[derive(Debug, Default)]
pub struct BoardSet {
    boards: IndexMap<BoardKey, Board>,
}

impl BoardSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the bodies in line with `textures`. Returns (added, removed).
    pub fn sync(
        &mut self,
        engine: &mut dyn PhysicsBackend,
        textures: &[String],
        host: Size,
        config: &FooterConfig,
        rng: &mut impl Rng,
    ) -> (usize, usize) {
        let wanted: Vec<BoardKey> = textures
            .iter()
            .enumerate()
            .map(|(slot, texture)| BoardKey {
                slot,
                texture: texture.clone(),
            })
            .collect();

        let mut removed = 0;
        self.boards.retain(|key, board| {
            let keep = wanted.contains(key);
            if !keep {
                engine.remove(board.handle);
                removed += 1;
            }
            keep
        });

        let mut added = 0;
        for key in wanted {
            if self.boards.contains_key(&key) {
                continue;
            }
            let handle = engine.add_board(&BoardBody {
                pose: spawn_pose(rng, host),
                width: config.board_width,
                height: config.board_height,
                corner_radius: config.board_corner_radius,
                restitution: config.restitution,
                friction: config.friction,
            });
            let texture = key.texture.clone();
            self.boards.insert(key, Board { handle, texture });
            added += 1;
        }
        self.boards.sort_by(|a, _, b, _| a.slot.cmp(&b.slot));

        if added > 0 || removed > 0 {
            debug!(added, removed, total = self.boards.len(), "boards synced");
        }
        (added, removed)
    }

    /// Remove every board body
    pub fn remove_all(&mut self, engine: &mut dyn PhysicsBackend) -> usize {
        let count = self.boards.len();
        for (_, board) in self.boards.drain(..) {
            engine.remove(board.handle);
        }
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Board> {
        self.boards.values()
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RapierBackend;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn urls(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| format!("/boards/{n}.png")).collect()
    }

    #[test]
    fn test_mobile_caps_visible_textures() {
        let five = urls(&["a", "b", "c", "d", "e"]);
        assert_eq!(visible_textures(&five, true, 3).len(), 3);
        assert_eq!(visible_textures(&five, false, 3).len(), 5);
        let two = urls(&["a", "b"]);
        assert_eq!(visible_textures(&two, true, 3).len(), 2);
        assert!(visible_textures(&[], true, 3).is_empty());
    }

    #[test]
    fn test_spawn_pose_stays_in_upper_half() {
        let mut rng = StdRng::seed_from_u64(7);
        let host = Size::new(1000.0, 600.0);
        for _ in 0..200 {
            let pose = spawn_pose(&mut rng, host);
            assert!((0.0..1000.0).contains(&pose.position.x));
            assert!((50.0..250.0).contains(&pose.position.y));
            assert!(pose.angle.abs() <= 50f32.to_radians());
        }
    }

    #[test]
    fn test_sync_is_incremental() {
        let mut engine = RapierBackend::new();
        let mut rng = StdRng::seed_from_u64(1);
        let config = FooterConfig::default();
        let host = Size::new(1000.0, 600.0);
        let mut boards = BoardSet::new();

        let first = urls(&["a", "b", "c"]);
        assert_eq!(boards.sync(&mut engine, &first, host, &config, &mut rng), (3, 0));
        let kept = boards.iter().next().unwrap().handle;

        let second = urls(&["a", "b"]);
        assert_eq!(boards.sync(&mut engine, &second, host, &config, &mut rng), (0, 1));
        assert_eq!(boards.iter().next().unwrap().handle, kept);
        assert_eq!(engine.body_count(), 2);

        assert_eq!(boards.remove_all(&mut engine), 2);
        assert_eq!(engine.body_count(), 0);
    }

    #[test]
    fn test_repeated_urls_are_distinct_boards() {
        let mut engine = RapierBackend::new();
        let mut rng = StdRng::seed_from_u64(2);
        let mut boards = BoardSet::new();
        let same = urls(&["a", "a", "a"]);
        boards.sync(
            &mut engine,
            &same,
            Size::new(800.0, 400.0),
            &FooterConfig::default(),
            &mut rng,
        );
        assert_eq!(boards.len(), 3);
    }
}

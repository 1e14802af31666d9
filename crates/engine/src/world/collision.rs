use bitflags::bitflags;

bitflags! {
    /// Collision classification. A body's `collision_group` says what it is,
    /// its `collides_with` says which groups it reacts to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CollisionGroups: u32 {
        const WALLS = 1 << 0;
        const PLAYER = 1 << 1;
        const SOLIDPLAYER = 1 << 2;
        const BONUS = 1 << 3;
        const DOORS = 1 << 4;
        const LADDER = 1 << 5;
        const ENEMIES = 1 << 6;
    }
}

impl CollisionGroups {
    /// `self` is a `collides_with` mask, `group` another body's `collision_group`.
    pub fn reacts_to(self, group: CollisionGroups) -> bool {
        self.intersects(group)
    }
}

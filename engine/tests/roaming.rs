use std::collections::HashSet;

use engine::grid::START;
use engine::roaming::roam;
use engine::{Dice, Grid, MapObject, ObjectCounts, ObjectKind, Pos, Roster, World};
use proptest::prelude::*;

fn enemy(x: usize, y: usize) -> MapObject {
    MapObject { pos: Pos::new(x, y), kind: ObjectKind::Enemy { species: "Zubat".into(), hp: 80 } }
}

fn corridor(objects: Vec<MapObject>) -> World {
    let mut w = World::new(Grid::parse("   \n###").unwrap());
    w.objects = objects;
    w
}

#[test]
fn enemy_steps_away_from_player() {
    let mut w = corridor(vec![enemy(1, 0)]);
    let mut dice = Dice::from_scripted(vec![0.0]);
    assert_eq!(roam(&mut w, &mut dice, Pos::new(0, 0)), 1);
    assert_eq!(w.objects[0].pos, Pos::new(2, 0));
}

#[test]
fn failed_chance_stays_put() {
    let mut w = corridor(vec![enemy(1, 0)]);
    let mut dice = Dice::from_scripted(vec![0.9]);
    assert_eq!(roam(&mut w, &mut dice, Pos::new(0, 0)), 0);
    assert_eq!(w.objects[0].pos, Pos::new(1, 0));
}

#[test]
fn starting_cells_block_each_other() {
    let mut w = corridor(vec![enemy(0, 0), enemy(1, 0)]);
    let mut dice = Dice::from_scripted(vec![0.0]);
    assert_eq!(roam(&mut w, &mut dice, Pos::new(2, 0)), 0);
}

#[test]
fn two_enemies_never_claim_one_cell() {
    let mut w = corridor(vec![enemy(0, 0), enemy(2, 0)]);
    let mut dice = Dice::from_scripted(vec![0.0]);
    // player parked on a wall so every floor cell is contested
    assert_eq!(roam(&mut w, &mut dice, Pos::new(0, 1)), 1);
    assert_eq!(w.objects[0].pos, Pos::new(1, 0));
    assert_eq!(w.objects[1].pos, Pos::new(2, 0));
}

#[test]
fn items_do_not_block_and_do_not_move() {
    let coin = MapObject { pos: Pos::new(1, 0), kind: ObjectKind::Coin { value: 5 } };
    let mut w = corridor(vec![enemy(0, 0), coin]);
    let mut dice = Dice::from_scripted(vec![0.0]);
    assert_eq!(roam(&mut w, &mut dice, Pos::new(2, 0)), 1);
    assert_eq!(w.objects[0].pos, Pos::new(1, 0));
    assert_eq!(w.objects[1].pos, Pos::new(1, 0));
}

proptest! {
    #[test]
    fn roaming_keeps_enemies_apart(seed in any::<u64>(), ticks in 1usize..20) {
        let roster = Roster::builtin().unwrap();
        let mut w = World::new(Grid::default_maze().unwrap());
        let mut dice = Dice::from_seed(seed);
        let counts = ObjectCounts { enemies: 12, ..ObjectCounts::empty() };
        w.populate(&mut dice, &roster, counts, START).unwrap();
        for _ in 0..ticks {
            roam(&mut w, &mut dice, START);
            let cells: HashSet<Pos> = w.objects.iter().map(|o| o.pos).collect();
            prop_assert_eq!(cells.len(), 12);
            prop_assert!(!cells.contains(&START));
            prop_assert!(cells.iter().all(|&p| w.grid.is_walkable(p)));
        }
    }
}

//! Area spell resolution.

use bevy::prelude::*;

use crate::catalog::{EffectKind, SpellEffect, TargetFilter};
use crate::element;
use crate::gameplay::combat::HealthDelta;
use crate::gameplay::{Dead, Elemental, Side, Targetable, tiles_to_pixels};
use crate::signals::SpellCast;

/// Query alias for everything a spell can touch.
pub type SpellRecipients<'w, 's> = Query<
    'w,
    's,
    (Entity, &'static Side, &'static Elemental, &'static Transform),
    (With<Targetable>, Without<Dead>),
>;

/// Resolves one spell cast at `position` by `caster`.
///
/// Everything inside the radius (inclusive) that passes the target filter
/// is affected. Damage is scaled per victim by the caster's element and
/// floored; heals restore a flat amount and only ever reach the caster's
/// own side, whatever the filter says. `heal_over_time` resolves as a
/// single instant heal.
pub fn resolve_spell(
    effect: &SpellEffect,
    caster_element: element::Element,
    position: Vec2,
    caster: Side,
    recipients: &SpellRecipients,
    deltas: &mut MessageWriter<HealthDelta>,
    casts: &mut MessageWriter<SpellCast>,
) {
    let radius = tiles_to_pixels(effect.radius);
    casts.write(SpellCast { position, radius });

    for (entity, side, elemental, transform) in recipients {
        let distance = position.distance(transform.translation.truncate());
        if distance > radius {
            continue;
        }
        let allowed = match effect.filter {
            TargetFilter::Friendly => *side == caster,
            TargetFilter::Enemy => *side != caster,
            TargetFilter::All => true,
        };
        if !allowed {
            continue;
        }

        let amount = match effect.kind {
            EffectKind::Damage => {
                let scaled =
                    f64::from(effect.magnitude) * element::multiplier(caster_element, elemental.0);
                scaled.floor() as i32
            }
            EffectKind::Heal | EffectKind::HealOverTime => {
                if *side != caster {
                    continue;
                }
                -effect.magnitude
            }
        };
        deltas.write(HealthDelta {
            target: entity,
            amount,
        });
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::element::Element;
    use crate::gameplay::Health;
    use crate::testing::{drain_messages, spawn_test_unit};
    use pretty_assertions::assert_eq;

    #[derive(Resource, Clone, Copy)]
    struct CastRequest {
        effect: SpellEffect,
        element: Element,
        position: Vec2,
        caster: Side,
    }

    fn cast_requested_spell(
        request: Res<CastRequest>,
        recipients: SpellRecipients,
        mut deltas: MessageWriter<HealthDelta>,
        mut casts: MessageWriter<SpellCast>,
    ) {
        resolve_spell(
            &request.effect,
            request.element,
            request.position,
            request.caster,
            &recipients,
            &mut deltas,
            &mut casts,
        );
    }

    fn create_spell_test_app(request: CastRequest) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<HealthDelta>();
        app.add_message::<SpellCast>();
        app.insert_resource(request);
        app.add_systems(Update, cast_requested_spell.run_if(run_once));
        app
    }

    fn damage_request(radius: f32, filter: TargetFilter) -> CastRequest {
        CastRequest {
            effect: SpellEffect {
                kind: EffectKind::Damage,
                magnitude: 100,
                radius,
                filter,
            },
            element: Element::Fire,
            position: Vec2::new(200.0, 300.0),
            caster: Side::Player,
        }
    }

    #[test]
    fn hits_everything_inside_the_radius_inclusive() {
        // 2 tiles = 40 px.
        let mut app = create_spell_test_app(damage_request(2.0, TargetFilter::Enemy));
        let world = app.world_mut();

        let on_edge = spawn_test_unit(world, Side::Enemy, 200.0, 340.0); // exactly 40
        let inside = spawn_test_unit(world, Side::Enemy, 200.0, 310.0);
        spawn_test_unit(world, Side::Enemy, 200.0, 341.0); // just outside

        app.update();

        let deltas = drain_messages::<HealthDelta>(&mut app);
        let mut hit: Vec<Entity> = deltas.iter().map(|d| d.target).collect();
        hit.sort();
        let mut expected = vec![on_edge, inside];
        expected.sort();
        assert_eq!(hit, expected);
        assert_eq!(drain_messages::<SpellCast>(&mut app).len(), 1);
    }

    #[test]
    fn enemy_filter_spares_allies() {
        let mut app = create_spell_test_app(damage_request(2.0, TargetFilter::Enemy));
        let world = app.world_mut();

        let foe = spawn_test_unit(world, Side::Enemy, 200.0, 310.0);
        spawn_test_unit(world, Side::Player, 200.0, 290.0);

        app.update();

        let deltas = drain_messages::<HealthDelta>(&mut app);
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].target, foe);
    }

    #[test]
    fn damage_scales_per_victim_element() {
        let mut app = create_spell_test_app(damage_request(2.0, TargetFilter::All));
        let world = app.world_mut();

        // Fire spell: earth victim takes 130, water victim 70.
        let earth = spawn_test_unit(world, Side::Enemy, 200.0, 310.0);
        world.entity_mut(earth).insert(Elemental(Element::Earth));
        let water = spawn_test_unit(world, Side::Enemy, 200.0, 290.0);
        world.entity_mut(water).insert(Elemental(Element::Water));

        app.update();

        let deltas = drain_messages::<HealthDelta>(&mut app);
        let amount_for = |e: Entity| deltas.iter().find(|d| d.target == e).unwrap().amount;
        assert_eq!(amount_for(earth), 130);
        assert_eq!(amount_for(water), 70);
    }

    #[test]
    fn heal_reaches_only_the_casters_side() {
        let mut request = damage_request(3.0, TargetFilter::All);
        request.effect.kind = EffectKind::Heal;
        let mut app = create_spell_test_app(request);
        let world = app.world_mut();

        let ally = spawn_test_unit(world, Side::Player, 200.0, 310.0);
        world.entity_mut(ally).get_mut::<Health>().unwrap().current = 40;
        spawn_test_unit(world, Side::Enemy, 200.0, 290.0);

        app.update();

        let deltas = drain_messages::<HealthDelta>(&mut app);
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].target, ally);
        assert_eq!(deltas[0].amount, -100);
    }

    #[test]
    fn heal_over_time_resolves_as_instant_heal() {
        let mut request = damage_request(3.0, TargetFilter::Friendly);
        request.effect.kind = EffectKind::HealOverTime;
        let mut app = create_spell_test_app(request);

        let ally = spawn_test_unit(app.world_mut(), Side::Player, 200.0, 310.0);

        app.update();

        let deltas = drain_messages::<HealthDelta>(&mut app);
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].target, ally);
        assert_eq!(deltas[0].amount, -100);
    }
}

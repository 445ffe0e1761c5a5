use socialgraph_core::models::{HobbyCambio, NuevoUsuario, Usuario, UsuarioCambios};
use socialgraph_core::{Catalog, GraphError, HobbyRepository, SocialGraph, UsuarioRepository};

async fn create_test_graph() -> SocialGraph {
    let graph = SocialGraph::in_memory().await.unwrap();
    assert!(graph.load_catalog(&Catalog::default()).await.unwrap());
    graph
}

async fn add_user(graph: &SocialGraph, nombre: &str, apellidos: &str, hobby: Option<i64>) -> i64 {
    let mut nuevo = NuevoUsuario::new(nombre, apellidos, 30, 19.4, -99.1);
    nuevo.hobby_id = hobby;
    graph.usuarios().create(nuevo).await.unwrap().usuario.id_usuario
}

#[tokio::test]
async fn test_create_assigns_sequential_ids_and_normalizes() {
    let graph = create_test_graph().await;
    let repo = graph.usuarios();

    let first = repo
        .create(NuevoUsuario::new("Rodrigó", "Pérez", 25, 10.0, 20.0).with_hobby(1))
        .await
        .unwrap();
    let second = repo
        .create(NuevoUsuario::new("Ana", "López", 40, 0.0, 0.0))
        .await
        .unwrap();

    assert_eq!(first.usuario.id_usuario, 1);
    assert_eq!(second.usuario.id_usuario, 2);
    assert_eq!(first.usuario.nombre_completo(), "rodrigo perez");

    let hobby = first.hobby.unwrap();
    assert_eq!(hobby.nombre, "futbol");
    assert_eq!(hobby.categoria.nombre, "deportes");
    assert!(second.hobby.is_none());
    assert_eq!(repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_find_by_id() {
    let graph = create_test_graph().await;
    let id = add_user(&graph, "Ana", "Lopez", Some(4)).await;

    let found = graph.usuarios().find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.usuario.nombre, "ana");
    assert_eq!(found.hobby.unwrap().id_hobby, 4);
    assert!(found.conexiones.is_empty());

    assert!(graph.usuarios().find_by_id(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_validation_leaves_store_untouched() {
    let graph = create_test_graph().await;
    let repo = graph.usuarios();

    let too_young = repo.create(NuevoUsuario::new("Ana", "Lopez", 11, 0.0, 0.0)).await;
    assert!(matches!(too_young, Err(GraphError::Validation { field: "edad", .. })));

    let bad_lat = repo.create(NuevoUsuario::new("Ana", "Lopez", 20, 91.0, 0.0)).await;
    assert!(matches!(bad_lat, Err(GraphError::Validation { field: "latitud", .. })));

    let blank = repo.create(NuevoUsuario::new("  ", "Lopez", 20, 0.0, 0.0)).await;
    assert!(matches!(blank, Err(GraphError::Validation { field: "nombre", .. })));

    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_hobby_is_not_found() {
    let graph = create_test_graph().await;
    let result = graph
        .usuarios()
        .create(NuevoUsuario::new("Ana", "Lopez", 20, 0.0, 0.0).with_hobby(99))
        .await;

    assert!(matches!(result, Err(GraphError::NotFound { entity: "hobby", .. })));
    assert_eq!(graph.usuarios().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_normalized_name_conflicts() {
    let graph = create_test_graph().await;
    add_user(&graph, "José", "Núñez", None).await;
    add_user(&graph, "Šebastián", "Dvořák", None).await;

    // letters outside Western Europe keep their base letter
    let other = graph
        .usuarios()
        .create(NuevoUsuario::new("Ebastian", "Dvorak", 50, 0.0, 0.0))
        .await
        .unwrap();
    assert_eq!(other.usuario.nombre, "ebastian");
    let dup = graph
        .usuarios()
        .create(NuevoUsuario::new("sebastian", "dvorak", 50, 0.0, 0.0))
        .await;
    assert!(matches!(dup, Err(GraphError::Conflict(_))));

    let result = graph
        .usuarios()
        .create(NuevoUsuario::new("JOSE", "nunez", 50, 0.0, 0.0))
        .await;
    assert!(matches!(result, Err(GraphError::Conflict(_))));
}

#[tokio::test]
async fn test_store_rejects_duplicate_name() {
    let graph = create_test_graph().await;
    let db = graph.db();

    // Two writers that both passed the name check race to insert.
    let mut usuario = Usuario {
        id_usuario: db.next_usuario_id().await.unwrap(),
        nombre: "ana".to_string(),
        apellidos: "lopez".to_string(),
        edad: 30,
        latitud: 0.0,
        longitud: 0.0,
    };
    db.insert_usuario(&usuario, Some(1)).await.unwrap();

    usuario.id_usuario = db.next_usuario_id().await.unwrap();
    let result = db.insert_usuario(&usuario, Some(1)).await;
    assert!(matches!(result, Err(GraphError::Conflict(_))));

    assert_eq!(db.count_usuarios().await.unwrap(), 1);
    assert_eq!(db.hobby_assignments(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_keeping_own_name_succeeds() {
    let graph = create_test_graph().await;
    let id = add_user(&graph, "Ana", "Lopez", None).await;

    let cambios = UsuarioCambios::reemplazo(NuevoUsuario::new("ANA", "López", 33, 1.0, 1.0));
    let updated = graph.usuarios().update(id, cambios).await.unwrap();
    assert_eq!(updated.usuario.nombre_completo(), "ana lopez");
    assert_eq!(updated.usuario.edad, 33);
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let graph = create_test_graph().await;
    let id = add_user(&graph, "Ana", "Lopez", Some(1)).await;

    let cambios = UsuarioCambios {
        edad: Some(31),
        ..Default::default()
    };
    let updated = graph.usuarios().update(id, cambios).await.unwrap();

    assert_eq!(updated.usuario.edad, 31);
    assert_eq!(updated.usuario.nombre, "ana");
    assert_eq!(updated.hobby.unwrap().id_hobby, 1);
}

#[tokio::test]
async fn test_hobby_update_replaces_previous_edge() {
    let graph = create_test_graph().await;
    let id = add_user(&graph, "Ana", "Lopez", Some(1)).await;
    let repo = graph.usuarios();

    let cambios = UsuarioCambios {
        hobby: HobbyCambio::Set(7),
        ..Default::default()
    };
    let updated = repo.update(id, cambios).await.unwrap();
    assert_eq!(updated.hobby.unwrap().nombre, "guitarra");

    let assignments = graph.db().hobby_assignments(None).await.unwrap();
    assert_eq!(assignments, vec![(id, 7)]);

    let cleared = repo
        .update(
            id,
            UsuarioCambios {
                hobby: HobbyCambio::Clear,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.hobby.is_none());
    assert!(graph.db().hobby_assignments(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_full_replacement_update() {
    let graph = create_test_graph().await;
    let id = add_user(&graph, "Ana", "Lopez", Some(1)).await;

    let replacement = NuevoUsuario::new("Beatriz", "Gómez", 45, -33.4, -70.6);
    let updated = graph
        .usuarios()
        .update(id, UsuarioCambios::reemplazo(replacement))
        .await
        .unwrap();

    assert_eq!(updated.usuario.id_usuario, id);
    assert_eq!(updated.usuario.nombre_completo(), "beatriz gomez");
    assert_eq!(updated.usuario.edad, 45);
    assert!(updated.hobby.is_none());
}

#[tokio::test]
async fn test_update_to_taken_name_conflicts() {
    let graph = create_test_graph().await;
    add_user(&graph, "Ana", "Lopez", None).await;
    let other = add_user(&graph, "Luis", "Diaz", None).await;

    let cambios = UsuarioCambios {
        nombre: Some("Ana".to_string()),
        apellidos: Some("López".to_string()),
        ..Default::default()
    };
    let result = graph.usuarios().update(other, cambios).await;
    assert!(matches!(result, Err(GraphError::Conflict(_))));
}

#[tokio::test]
async fn test_update_missing_user() {
    let graph = create_test_graph().await;
    let result = graph.usuarios().update(42, UsuarioCambios::default()).await;
    assert!(matches!(result, Err(GraphError::NotFound { entity: "usuario", .. })));
}

#[tokio::test]
async fn test_delete_removes_every_incident_edge() {
    let graph = create_test_graph().await;
    let repo = graph.usuarios();
    let a = add_user(&graph, "Ana", "Lopez", None).await;
    let b = add_user(&graph, "Luis", "Diaz", None).await;
    let c = add_user(&graph, "Eva", "Ruiz", None).await;

    repo.create_connection(a, b).await.unwrap();
    repo.create_connection(b, a).await.unwrap();
    repo.create_connection(c, b).await.unwrap();
    repo.create_connection(a, c).await.unwrap();

    repo.delete(b).await.unwrap();

    let edges = graph.db().all_edges().await.unwrap();
    assert!(edges.iter().all(|e| e.origen != b && e.destino != b));
    assert_eq!(edges.len(), 1);
    assert!(repo.find_by_id(b).await.unwrap().is_none());
    assert!(matches!(repo.delete(b).await, Err(GraphError::NotFound { .. })));
}

#[tokio::test]
async fn test_delete_keeps_hobby_vertex() {
    let graph = create_test_graph().await;
    for (nombre, apellidos) in [("a", "uno"), ("b", "dos"), ("c", "tres"), ("d", "cuatro")] {
        add_user(&graph, nombre, apellidos, None).await;
    }
    let futbolista = add_user(&graph, "Fútbol", "Fan", Some(1)).await;
    assert_eq!(futbolista, 5);

    graph.usuarios().delete(futbolista).await.unwrap();

    assert!(graph.db().hobby_assignments(None).await.unwrap().is_empty());
    let futbol = graph.hobbies().find_by_id(1).await.unwrap().unwrap();
    assert_eq!(futbol.nombre, "futbol");
    assert_eq!(futbol.categoria.nombre, "deportes");
    assert_eq!(graph.hobbies().list().await.unwrap().len(), 10);
}

#[tokio::test]
async fn test_create_connection_then_list() {
    let graph = create_test_graph().await;
    let repo = graph.usuarios();
    let a = add_user(&graph, "Ana", "Lopez", Some(2)).await;
    let b = add_user(&graph, "Luis", "Diaz", Some(3)).await;

    repo.create_connection(a, b).await.unwrap();

    let listed = repo.list_connections(a).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].usuario.id_usuario, b);
    assert_eq!(listed[0].hobby.as_ref().unwrap().nombre, "tenis");

    // directed: nothing flows back
    assert!(repo.list_connections(b).await.unwrap().is_empty());
    assert_eq!(repo.find_by_id(a).await.unwrap().unwrap().conexiones, vec![b]);
}

#[tokio::test]
async fn test_duplicate_connection_is_rejected() {
    let graph = create_test_graph().await;
    let repo = graph.usuarios();
    let a = add_user(&graph, "Ana", "Lopez", None).await;
    let b = add_user(&graph, "Luis", "Diaz", None).await;

    repo.create_connection(a, b).await.unwrap();
    let second = repo.create_connection(a, b).await;
    assert!(matches!(second, Err(GraphError::Conflict(_))));

    let out: Vec<_> = graph
        .db()
        .edges_from(&[a])
        .await
        .unwrap()
        .into_iter()
        .filter(|e| e.destino == b)
        .collect();
    assert_eq!(out.len(), 1);
}

#[tokio::test]
async fn test_store_rejects_duplicate_edge() {
    let graph = create_test_graph().await;
    let a = add_user(&graph, "Ana", "Lopez", None).await;
    let b = add_user(&graph, "Luis", "Diaz", None).await;

    graph.db().insert_conectado(a, b).await.unwrap();
    let result = graph.db().insert_conectado(a, b).await;
    assert!(matches!(result, Err(GraphError::Conflict(_))));
}

#[tokio::test]
async fn test_connection_errors() {
    let graph = create_test_graph().await;
    let repo = graph.usuarios();
    let a = add_user(&graph, "Ana", "Lopez", None).await;
    let b = add_user(&graph, "Luis", "Diaz", None).await;

    assert!(matches!(repo.create_connection(a, a).await, Err(GraphError::SelfLoop(id)) if id == a));
    assert!(matches!(
        repo.create_connection(a, 999).await,
        Err(GraphError::NotFound { entity: "usuario", .. })
    ));
    assert!(matches!(repo.delete_connection(a, a).await, Err(GraphError::SelfLoop(_))));
    assert!(matches!(
        repo.delete_connection(a, b).await,
        Err(GraphError::NotFound { entity: "conexion", .. })
    ));
    assert!(matches!(
        repo.list_connections(999).await,
        Err(GraphError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_delete_connection() {
    let graph = create_test_graph().await;
    let repo = graph.usuarios();
    let a = add_user(&graph, "Ana", "Lopez", None).await;
    let b = add_user(&graph, "Luis", "Diaz", None).await;

    repo.create_connection(a, b).await.unwrap();
    repo.create_connection(b, a).await.unwrap();
    repo.delete_connection(a, b).await.unwrap();

    assert!(repo.list_connections(a).await.unwrap().is_empty());
    assert_eq!(repo.list_connections(b).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_find_all_pages() {
    let graph = create_test_graph().await;
    for i in 0..5 {
        add_user(&graph, "usuario", &format!("numero {}", i), Some(1)).await;
    }
    let repo = graph.usuarios();

    let page = repo.find_all(2, 2).await.unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages(), 3);
    assert_eq!(page.current_page(), 2);
    let ids: Vec<i64> = page.items.iter().map(|u| u.usuario.id_usuario).collect();
    assert_eq!(ids, vec![3, 4]);
    assert!(page.items.iter().all(|u| u.hobby.is_some()));

    assert!(matches!(repo.find_all(0, 0).await, Err(GraphError::Validation { field: "limit", .. })));
    assert!(repo.find_all(0, 1001).await.is_err());
}

#[tokio::test]
async fn test_full_name() {
    let graph = create_test_graph().await;
    let id = add_user(&graph, "Ana", "López García", None).await;
    assert_eq!(graph.usuarios().full_name(id).await.unwrap(), "ana lopez garcia");
}

#[tokio::test]
async fn test_hobby_list_ordered_with_categories() {
    let graph = create_test_graph().await;
    let hobbies = graph.hobbies().list().await.unwrap();

    let ids: Vec<i64> = hobbies.iter().map(|h| h.id_hobby).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    assert_eq!(hobbies[3].nombre, "pintura");
    assert_eq!(hobbies[3].categoria.nombre, "arte y cultura");

    // loading twice is a no-op
    assert!(!graph.load_catalog(&Catalog::default()).await.unwrap());
    assert_eq!(graph.hobbies().list().await.unwrap().len(), 10);
}

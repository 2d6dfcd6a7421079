fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <mesh.glb>", args[0]);
        std::process::exit(1);
    }

    let (document, buffers, _) = gltf::import(&args[1])
        .unwrap_or_else(|e| panic!("failed to read {}: {}", args[1], e));

    let generator = document.as_json().asset.generator.clone().unwrap_or_default();
    println!("Generator: {}", generator);
    println!("Meshes: {}, nodes: {}, materials: {}",
             document.meshes().len(), document.nodes().len(), document.materials().len());

    let mut vertices = 0usize;
    let mut indices = 0usize;
    let mut min = [f32::INFINITY; 3];
    let mut max = [f32::NEG_INFINITY; 3];

    for mesh in document.meshes() {
        for primitive in mesh.primitives() {
            let bbox = primitive.bounding_box();
            println!("Accessor bounds: [{:.6}, {:.6}, {:.6}] - [{:.6}, {:.6}, {:.6}]",
                     bbox.min[0], bbox.min[1], bbox.min[2], bbox.max[0], bbox.max[1], bbox.max[2]);

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
            if let Some(positions) = reader.read_positions() {
                for p in positions {
                    vertices += 1;
                    for k in 0..3 {
                        min[k] = min[k].min(p[k]);
                        max[k] = max[k].max(p[k]);
                    }
                }
            }
            if let Some(read) = reader.read_indices() {
                indices += read.into_u32().count();
            }
        }
    }

    println!("Vertices: {}", vertices);
    println!("Indices: {} ({} triangles)", indices, indices / 3);
    if vertices > 0 {
        println!("Min XYZ: {:.6}, {:.6}, {:.6}", min[0], min[1], min[2]);
        println!("Max XYZ: {:.6}, {:.6}, {:.6}", max[0], max[1], max[2]);
    }
}

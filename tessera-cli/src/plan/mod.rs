// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use clap::Args;

use tessera_core::constant;
use tessera_core::tile::Window;

#[derive(Debug, Args)]
#[command(about = "Print the padding plan and tile grid for an image shape.")]
pub struct PlanArgs {
    #[arg(long, help = "Source image height.", required = true)]
    pub height: u32,

    #[arg(long, help = "Source image width.", required = true)]
    pub width: u32,

    #[arg(
        short = 's',
        long,
        help = "Tile side length in pixels.",
        default_value_t = constant::DEFAULT_TILE_SIZE
    )]
    pub tile_size: u32,

    #[arg(
        short = 'o',
        long,
        help = "Overlap between adjacent tiles in pixels.",
        default_value_t = constant::DEFAULT_OVERLAP
    )]
    pub overlap: u32,
}

pub fn plan(args: &PlanArgs) {
    let window = Window::new(args.tile_size, args.overlap).unwrap_or_else(|err| {
        eprintln!("[tessera::plan] ERROR: {}", err);
        std::process::exit(1);
    });

    for line in render(&window, args.height, args.width) {
        println!("{}", line);
    }
}

/// Describe the canvas and tiles of an image shape, one line per entry
pub fn render(window: &Window, height: u32, width: u32) -> Vec<String> {
    let padding = window.plan(height, width);
    let padded_height = padding.padded_height(height);
    let padded_width = padding.padded_width(width);

    let tiles = window.tiles(padded_height, padded_width);
    let (rows, columns) = window.grid_shape(padded_height, padded_width);

    let mut lines = vec![
        format!("padding: bottom={} right={}", padding.bottom, padding.right),
        format!("canvas: height={} width={}", padded_height, padded_width),
        format!("tiles: {} ({} x {})", tiles.len(), rows, columns),
    ];

    for (index, tile) in tiles.iter().enumerate() {
        lines.push(format!(
            "{}\t{}\t{}\t{}\t{}",
            index, tile.ymin, tile.xmin, tile.ymax, tile.xmax
        ));
    }

    lines
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    pub fn test_render() {
        let window = Window::new(640, 140).unwrap();
        let lines = render(&window, 1000, 1000);

        assert_eq!(lines[0], "padding: bottom=140 right=140");
        assert_eq!(lines[1], "canvas: height=1140 width=1140");
        assert_eq!(lines[2], "tiles: 4 (2 x 2)");
        assert_eq!(lines[3], "0\t0\t0\t640\t640");
        assert_eq!(lines[6], "3\t500\t500\t1140\t1140");
        assert_eq!(lines.len(), 7);
    }
}
